//! Common string helpers shared across the codebase.

/// Removes every line break and trims surrounding whitespace.
///
/// This is the display form stored in the dictionary: interior spacing is
/// kept, only newlines disappear.
///
/// # Examples
///
/// ```
/// use autointl::utils::normalize_text;
///
/// assert_eq!(normalize_text("  你好  "), "你好");
/// assert_eq!(normalize_text("你好\n  世界"), "你好  世界");
/// assert_eq!(normalize_text("\r\n"), "");
/// ```
pub fn normalize_text(text: &str) -> String {
    text.replace(['\r', '\n'], "").trim().to_string()
}

/// Escapes cooked text so it can be used as the raw body of a template
/// literal segment.
///
/// # Examples
///
/// ```
/// use autointl::utils::escape_template_raw;
///
/// assert_eq!(escape_template_raw("a`b"), "a\\`b");
/// assert_eq!(escape_template_raw("${x}"), "\\${x}");
/// assert_eq!(escape_template_raw("C:\\dir"), "C:\\\\dir");
/// ```
pub fn escape_template_raw(cooked: &str) -> String {
    let mut raw = String::with_capacity(cooked.len());
    let mut chars = cooked.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => raw.push_str("\\\\"),
            '`' => raw.push_str("\\`"),
            '$' if chars.peek() == Some(&'{') => raw.push_str("\\$"),
            '\r' => raw.push_str("\\r"),
            _ => raw.push(c),
        }
    }
    raw
}

/// Pluralizes a noun for summary lines: `1 file`, `2 files`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
