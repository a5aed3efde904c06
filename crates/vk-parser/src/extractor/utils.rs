//! Text-windowing primitives shared by the extraction rules.
//!
//! The page body is a loosely structured HTML/JS blob; every rule is a
//! chain of "slice between two markers" steps followed by JSON string
//! literal decoding. Keeping the steps as named helpers keeps each rule
//! auditable and testable on its own.

/// Returns the slice of `haystack` between the first occurrence of
/// `start` and the next occurrence of `end` after it.
///
/// First match wins, left to right; later occurrences of either marker
/// are ignored.
#[inline]
pub fn text_between<'a>(haystack: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = haystack.find(start)? + start.len();
    let rest = &haystack[from..];
    let to = rest.find(end)?;
    Some(&rest[..to])
}

/// Decodes `raw` as the body of a JSON string literal (`\/` becomes `/`,
/// `\u....` escapes are resolved, and so on).
///
/// Malformed input and empty results both yield `None`; a broken escape
/// sequence means the field is absent, not a hard error.
pub fn decode_json_string(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let decoded: String = serde_json::from_str(&format!("\"{raw}\"")).ok()?;
    (!decoded.is_empty()).then_some(decoded)
}

/// The window chain shared by every `key"` token: slice from the token to
/// the next comma, take the text between the first pair of double quotes
/// inside that window, then decode it as a JSON string literal.
pub fn quoted_value_after(haystack: &str, token: &str) -> Option<String> {
    let window = text_between(haystack, token, ",")?;
    let inner = text_between(window, "\"", "\"")?;
    decode_json_string(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_between_basic() {
        assert_eq!(text_between("a[b]c", "[", "]"), Some("b"));
    }

    #[test]
    fn test_text_between_uses_first_match() {
        assert_eq!(text_between("x<1>y<2>z", "<", ">"), Some("1"));
    }

    #[test]
    fn test_text_between_end_after_start() {
        // the "]" before "[" must not terminate the window
        assert_eq!(text_between("]a[b]c", "[", "]"), Some("b"));
    }

    #[test]
    fn test_text_between_missing_markers() {
        assert_eq!(text_between("abc", "[", "]"), None);
        assert_eq!(text_between("a[bc", "[", "]"), None);
    }

    #[test]
    fn test_text_between_empty_window() {
        assert_eq!(text_between("a[]c", "[", "]"), Some(""));
    }

    #[test]
    fn test_decode_json_string_unescapes_slashes() {
        assert_eq!(
            decode_json_string(r"https:\/\/a.com\/v.mp4").as_deref(),
            Some("https://a.com/v.mp4")
        );
    }

    #[test]
    fn test_decode_json_string_unicode_escape() {
        assert_eq!(decode_json_string(r"AB").as_deref(), Some("AB"));
        assert_eq!(
            decode_json_string(r"https:\/\/a.com\/п?q=é").as_deref(),
            Some("https://a.com/п?q=é")
        );
    }

    #[test]
    fn test_decode_json_string_rejects_empty_and_malformed() {
        assert_eq!(decode_json_string(""), None);
        // dangling backslash is not a valid escape
        assert_eq!(decode_json_string("\\"), None);
        assert_eq!(decode_json_string(r"\x41"), None);
    }

    #[test]
    fn test_quoted_value_after() {
        let page = r#"left,"url240":"https:\/\/a.com\/v.240.mp4?x=1",rest"#;
        assert_eq!(
            quoted_value_after(page, "url240\"").as_deref(),
            Some("https://a.com/v.240.mp4?x=1")
        );
        assert_eq!(quoted_value_after(page, "url360\""), None);
    }
}
