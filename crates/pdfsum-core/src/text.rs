use textwrap::{Options, WrapAlgorithm};

use crate::SNIPPET_CHARS;

/// Expand common typographic ligatures found in PDFs.
pub fn expand_ligatures(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace(['\u{FB05}', '\u{FB06}'], "st")
}

/// First [`SNIPPET_CHARS`] characters of `text` followed by `"..."`.
///
/// Counts Unicode scalar values, so multi-byte characters are never split.
pub fn snippet(text: &str) -> String {
    let mut out: String = text.chars().take(SNIPPET_CHARS).collect();
    out.push_str("...");
    out
}

/// Greedy word wrap at `width` columns.
pub(crate) fn wrap_lines(raw: &str, width: usize) -> Vec<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Vec::new();
    }
    let options = Options::new(width.max(1)).wrap_algorithm(WrapAlgorithm::FirstFit);
    textwrap::wrap(&collapsed, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_ligatures() {
        assert_eq!(expand_ligatures("ﬁnding ﬂow"), "finding flow");
        assert_eq!(expand_ligatures("eﬃcient oﬄine"), "efficient offline");
        assert_eq!(expand_ligatures("no ligatures here"), "no ligatures here");
    }

    #[test]
    fn snippet_of_long_text_is_200_chars_plus_ellipsis() {
        let text = "x".repeat(500);
        let s = snippet(&text);
        assert_eq!(s.len(), 203);
        assert!(s.ends_with("..."));
        assert_eq!(&s[..200], &text[..200]);
    }

    #[test]
    fn snippet_counts_characters_not_bytes() {
        let text = "é".repeat(300);
        let s = snippet(&text);
        assert_eq!(s.chars().count(), 203);
        assert!(s.starts_with("ééé"));
    }

    #[test]
    fn snippet_of_short_text_keeps_everything() {
        assert_eq!(snippet("short"), "short...");
        assert_eq!(snippet(""), "...");
    }

    #[test]
    fn wrapped_lines_fit_width() {
        let words = "The quick brown fox jumps over the lazy dog while the summarizer keeps \
                     producing sentences that are long enough to need several lines of output.";
        let raw = words.repeat(8);
        let lines = wrap_lines(&raw, 80);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 80, "line too long: {line:?}");
        }
    }

    #[test]
    fn wrap_collapses_whitespace() {
        assert_eq!(wrap_lines("a\n\nb\t c  ", 80), vec!["a b c".to_string()]);
        assert!(wrap_lines(" \n\t ", 80).is_empty());
    }

    #[test]
    fn wrap_breaks_overlong_words() {
        let word = "a".repeat(200);
        let lines = wrap_lines(&word, 80);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.len() <= 80));
        assert_eq!(lines.concat(), word);
    }
}
