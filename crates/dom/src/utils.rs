//! Escaping helpers used by the serializer

use std::borrow::Cow;

/// Named entity for each character the serializer escapes
fn entity(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '\'' => Some("&#39;"),
        '"' => Some("&quot;"),
        _ => None,
    }
}

/// Escape `& < > ' "` and nothing else
///
/// Borrows the input when there is nothing to replace.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    let Some(first) = text.find(|c: char| entity(c).is_some()) else {
        return Cow::Borrowed(text);
    };

    let mut escaped = String::with_capacity(text.len() + 8);
    escaped.push_str(&text[..first]);
    for c in text[first..].chars() {
        match entity(c) {
            Some(replacement) => escaped.push_str(replacement),
            None => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Append ` name="value"` with the value escaped
pub fn push_attribute(output: &mut String, name: &str, value: &str) {
    output.push(' ');
    output.push_str(name);
    output.push_str("=\"");
    output.push_str(&escape_text(value));
    output.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a&b<c>"), "a&amp;b&lt;c&gt;");
        assert_eq!(escape_text(r#"'x' "y""#), "&#39;x&#39; &quot;y&quot;");
    }

    #[test]
    fn test_escape_leaves_other_characters() {
        let input = "Hey 🌱 © = / \\";
        assert!(matches!(escape_text(input), Cow::Borrowed(_)));
        assert_eq!(escape_text(input), input);
    }

    #[test]
    fn test_push_attribute() {
        let mut out = String::new();
        push_attribute(&mut out, "title", "a \"b\"");
        assert_eq!(out, r#" title="a &quot;b&quot;""#);
    }
}
