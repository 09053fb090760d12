use serde_json::{Map, Value};
use winnow::{
    ModalResult, Parser,
    token::{any, take_while},
};

/// The logical payload of a tag
#[derive(Debug, Clone, PartialEq)]
pub enum TagContent {
    PlainText(String),

    /// `http` and `https` urls
    AbsoluteUrl(String),

    /// Deep links such as `instagram://user?username=bob`
    CustomSchemeUri(String),

    StructuredJson(Map<String, Value>),
}

impl TagContent {
    /// Classify a string by whether it starts with `scheme://`
    pub fn classify(content: impl Into<String>) -> Self {
        let content = content.into();

        match uri_scheme(&content) {
            Some(scheme) if is_web_scheme(scheme) => TagContent::AbsoluteUrl(content),
            Some(_) => TagContent::CustomSchemeUri(content),
            None => TagContent::PlainText(content),
        }
    }

    pub fn is_uri(&self) -> bool {
        matches!(self, TagContent::AbsoluteUrl(_) | TagContent::CustomSchemeUri(_))
    }
}

/// Input accepted by [`crate::session::TagSession::write`]
#[derive(Debug, Clone, PartialEq)]
pub enum WriteContent {
    /// A string, classified with [`TagContent::classify`]
    Text(String),

    Json(Map<String, Value>),

    /// Content whose kind the caller already decided
    Tagged(TagContent),

    /// Passed to the platform unmodified
    Bytes(Vec<u8>),
}

impl From<String> for WriteContent {
    fn from(text: String) -> Self {
        WriteContent::Text(text)
    }
}

impl From<&str> for WriteContent {
    fn from(text: &str) -> Self {
        WriteContent::Text(text.to_string())
    }
}

impl From<Map<String, Value>> for WriteContent {
    fn from(json: Map<String, Value>) -> Self {
        WriteContent::Json(json)
    }
}

impl From<Vec<u8>> for WriteContent {
    fn from(data: Vec<u8>) -> Self {
        WriteContent::Bytes(data)
    }
}

impl From<TagContent> for WriteContent {
    fn from(content: TagContent) -> Self {
        WriteContent::Tagged(content)
    }
}

/// Scheme of a string matching `^[a-z0-9+.-]+://.+` (case insensitive)
pub fn uri_scheme(content: &str) -> Option<&str> {
    let mut input = content;
    scheme_prefix.parse_next(&mut input).ok()
}

pub fn has_uri_scheme(content: &str) -> bool {
    uri_scheme(content).is_some()
}

fn scheme_prefix<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    let scheme = take_while(1.., is_scheme_char).parse_next(input)?;
    "://".parse_next(input)?;

    // at least one character that is not a line terminator
    any.verify(|c: &char| !is_line_terminator(*c)).parse_next(input)?;

    Ok(scheme)
}

fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-')
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn is_web_scheme(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_urls() {
        let content = TagContent::classify("https://instagram.com/bob");
        assert_eq!(content, TagContent::AbsoluteUrl("https://instagram.com/bob".into()));

        let content = TagContent::classify("HTTP://EXAMPLE.COM");
        assert_eq!(content, TagContent::AbsoluteUrl("HTTP://EXAMPLE.COM".into()));
    }

    #[test]
    fn custom_schemes() {
        for uri in ["myapp://open", "instagram://user?username=bob", "vnd.youtube://user/x"] {
            assert_eq!(TagContent::classify(uri), TagContent::CustomSchemeUri(uri.into()));
        }
    }

    #[test]
    fn plain_text() {
        for text in [
            "hello world",
            "example.com",
            "WIFI:T:WPA;S:Home;P:1234;;",
            "mailto:bob@example.com",
            "://missing-scheme",
            "https://",
            "https://\nnext line",
            "my app://open",
            "",
        ] {
            assert_eq!(TagContent::classify(text), TagContent::PlainText(text.into()), "{text:?}");
        }
    }

    #[test]
    fn only_the_first_character_after_the_scheme_matters() {
        assert!(has_uri_scheme("app://x\nmore"));
        assert!(has_uri_scheme("app:// "));
    }

    #[test]
    fn scheme_is_extracted() {
        assert_eq!(uri_scheme("git+ssh://host/repo"), Some("git+ssh"));
        assert_eq!(uri_scheme("text"), None);
    }
}
