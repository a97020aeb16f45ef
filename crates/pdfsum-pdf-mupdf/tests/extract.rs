//! Extraction tests against small PDFs built in memory.

use pdfsum_core::{BackendError, PdfBackend};
use pdfsum_pdf_mupdf::MupdfBackend;

/// Build a PDF with one Helvetica text line per page.
fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();
    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    objects.push("<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string());
    for (i, text) in pages.iter().enumerate() {
        let content = format!("BT /F1 18 Tf 72 700 Td ({text}) Tj ET");
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ));
    }

    let mut out = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n{body}\nendobj\n", i + 1).as_bytes());
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            objects.len() + 1
        )
        .as_bytes(),
    );
    out
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn single_page_text_round_trips() {
    let pdf = build_pdf(&["Quarterly results exceeded expectations"]);
    let text = MupdfBackend::new().extract_text(&pdf).unwrap();
    assert_eq!(normalize(&text), "Quarterly results exceeded expectations");
}

#[test]
fn pages_are_concatenated_in_order() {
    let pdf = build_pdf(&["First page", "Second page", "Third page"]);
    let text = MupdfBackend::new().extract_text(&pdf).unwrap();
    assert_eq!(normalize(&text), "First page Second page Third page");

    let first = text.find("First").unwrap();
    let second = text.find("Second").unwrap();
    let third = text.find("Third").unwrap();
    assert!(first < second && second < third);
}

#[test]
fn core_extract_goes_through_backend() {
    let pdf = build_pdf(&["Hello from MuPDF"]);
    let text = pdfsum_core::extract(&MupdfBackend::new(), &pdf).unwrap();
    assert_eq!(normalize(text.as_str()), "Hello from MuPDF");
}

#[test]
fn garbage_bytes_fail_to_open() {
    let result = MupdfBackend::new().extract_text(b"this is plainly not a PDF document");
    assert!(matches!(
        result,
        Err(BackendError::Open(_) | BackendError::Extraction(_))
    ));
}
