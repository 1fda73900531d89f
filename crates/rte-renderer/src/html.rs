//! HTML tag builders and script-safe value encoding.

use serde::Serialize;

use crate::error::RenderError;

/// Escape text for use in HTML content or a quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// `<script src="URL"></script>`
pub(crate) fn script_tag(url: &str) -> String {
    format!(r#"<script src="{}"></script>"#, escape_html(url))
}

/// `<script type="module" src="URL"></script>`
pub(crate) fn module_script_tag(url: &str) -> String {
    format!(r#"<script type="module" src="{}"></script>"#, escape_html(url))
}

/// `<link rel="stylesheet" href="URL" />`
pub(crate) fn style_tag(url: &str) -> String {
    format!(r#"<link rel="stylesheet" href="{}" />"#, escape_html(url))
}

/// Serialize `value` as a JSON literal safe to embed inside `<script>`.
///
/// `<`, `>` and `&` only occur inside JSON strings, so replacing them with
/// `\u` escapes keeps the literal decoding to the same value while making
/// `</script>` and `<!--` sequences impossible. U+2028/U+2029 are escaped
/// for pre-ES2019 parsers.
pub fn script_safe_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    let json = serde_json::to_string(value)?;
    let mut result = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => result.push_str("\\u003c"),
            '>' => result.push_str("\\u003e"),
            '&' => result.push_str("\\u0026"),
            '\u{2028}' => result.push_str("\\u2028"),
            '\u{2029}' => result.push_str("\\u2029"),
            _ => result.push(c),
        }
    }
    Ok(result)
}
