use axum::response::Html;

const INDEX_HTML: &str = include_str!("../../../templates/index.html");

/// Render the upload page, naming the model in the progress message.
pub fn render_index(model_name: &str) -> Html<String> {
    let html = INDEX_HTML.replace("{{ model_name }}", &escape_html(model_name));
    Html(html)
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_name_is_injected_and_escaped() {
        let Html(page) = render_index("<bart & co>");
        assert!(page.contains("&lt;bart &amp; co&gt;"));
        assert!(!page.contains("{{ model_name }}"));
    }
}
