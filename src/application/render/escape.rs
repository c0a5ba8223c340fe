/// Escape a value for HTML text content or a double-quoted attribute.
///
/// Every interpolated value in rendered markup goes through here, including
/// resolved URLs.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    push_escaped(&mut escaped, value);
    escaped
}

pub(crate) fn push_escaped(buffer: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => buffer.push_str("&amp;"),
            '<' => buffer.push_str("&lt;"),
            '>' => buffer.push_str("&gt;"),
            '"' => buffer.push_str("&quot;"),
            '\'' => buffer.push_str("&#39;"),
            _ => buffer.push(ch),
        }
    }
}
