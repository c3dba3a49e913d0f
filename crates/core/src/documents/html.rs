//! HTML escaping and the page shell shared by every printable document.

/// Placeholder for missing values in printable documents.
pub const PLACEHOLDER_HTML: &str = "N/A";

/// Placeholder for missing cells in tabular exports and tables.
pub const PLACEHOLDER_TABLE: &str = "-";

/// Escape text for interpolation into element content or a quoted
/// attribute value.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Escaped value, or the `N/A` placeholder when missing or blank.
pub fn text_or_na(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => escape_html(v),
        _ => PLACEHOLDER_HTML.to_string(),
    }
}

/// Multi-line text: escaped, with line breaks kept.
pub fn paragraph_or_na(value: Option<&str>) -> String {
    text_or_na(value).replace('\n', "<br>")
}

/// One `<tr><th>label</th><td>value</td></tr>` detail row.
pub(crate) fn detail_row(label: &str, value: Option<&str>) -> String {
    format!(
        "<tr><th>{}</th><td>{}</td></tr>",
        escape_html(label),
        text_or_na(value)
    )
}

const STYLE: &str = "\
body{font-family:Helvetica,Arial,sans-serif;margin:32px;color:#1f2933}\
h1{font-size:22px;margin:0 0 4px}\
h2{font-size:16px;margin:24px 0 8px;border-bottom:1px solid #cbd2d9;padding-bottom:4px}\
.meta{color:#616e7c;font-size:12px;margin-bottom:16px}\
table{border-collapse:collapse;width:100%;font-size:13px}\
th,td{border:1px solid #e4e7eb;padding:6px 8px;text-align:left;vertical-align:top}\
th{background:#f5f7fa;width:30%}\
table.list th{width:auto}\
.empty{color:#9aa5b1;font-style:italic}\
@media print{body{margin:0}}";

/// Wrap a document body in a complete, self-contained page.
pub(crate) fn page(title: &str, subtitle: &str, body: &str) -> String {
    let title = escape_html(title);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>{title}</h1>\n<div class=\"meta\">{subtitle}</div>\n{body}\n</body>\n</html>\n",
        subtitle = escape_html(subtitle),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_is_neutralised() {
        assert_eq!(
            escape_html(r#"<img src=x onerror="alert('x')">&"#),
            "&lt;img src=x onerror=&quot;alert(&#39;x&#39;)&quot;&gt;&amp;"
        );
    }

    #[test]
    fn missing_and_blank_render_placeholder() {
        assert_eq!(text_or_na(None), "N/A");
        assert_eq!(text_or_na(Some("  ")), "N/A");
        assert_eq!(text_or_na(Some("a<b")), "a&lt;b");
    }

    #[test]
    fn paragraphs_keep_line_breaks() {
        assert_eq!(paragraph_or_na(Some("one\ntwo")), "one<br>two");
    }
}
