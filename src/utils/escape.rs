use askama::filters::{Html, HtmlSafe, escape};
use std::fmt;

/// Text that has been HTML-escaped. The only way to build one is
/// [`escape_html`], so anything typed `Escaped` is safe to emit verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escaped(String);

impl Escaped {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Escaped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// already escaped; templates must not escape it a second time
impl HtmlSafe for Escaped {}

pub fn escape_html(raw: &str) -> Escaped {
    let escaped = escape(raw, Html)
        .map(|safe| safe.to_string())
        .unwrap_or_default();
    Escaped(escaped)
}

pub fn escape_or(raw: Option<&str>, fallback: &str) -> Escaped {
    escape_html(raw.unwrap_or(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_markup() {
        let escaped = escape_html("<script>alert(\"x\" & 'y')</script>");
        assert_eq!(
            escaped.as_str(),
            "&#60;script&#62;alert(&#34;x&#34; &#38; &#39;y&#39;)&#60;/script&#62;"
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_html("203.0.113.5").as_str(), "203.0.113.5");
        assert_eq!(escape_html("").as_str(), "");
    }

    #[test]
    fn test_fallback_is_escaped_too() {
        assert_eq!(escape_or(None, "N/A").as_str(), "N/A");
        assert_eq!(escape_or(Some("a<b"), "N/A").as_str(), "a&#60;b");
    }
}
