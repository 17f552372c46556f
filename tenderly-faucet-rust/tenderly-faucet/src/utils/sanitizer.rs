/// Escape text for inclusion in HTML element content or a quoted attribute
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Trim user input and drop control characters
pub fn sanitize_input(input: &str) -> String {
    input.trim().chars().filter(|c| !c.is_control()).collect()
}
