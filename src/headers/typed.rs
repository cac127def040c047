//! Typed header values.
//!
//! Each type knows its header name and how to render its value, so callers
//! can write `headers.append_typed(Accept::default())` instead of spelling
//! both halves by hand.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::config::{
    HEADER_ACCEPT, HEADER_ACCEPT_ENCODING, HEADER_AUTHORIZATION, HEADER_CONNECTION,
    HEADER_CONTENT_ENCODING, HEADER_CONTENT_LENGTH, HEADER_CONTENT_TYPE, HEADER_LOCATION,
    HEADER_TRANSFER_ENCODING, HEADER_USER_AGENT,
};

/// A header with a fixed name and a rendered value.
pub trait TypedHeader {
    const NAME: &'static str;

    fn value(&self) -> String;
}

/// Media types the client accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accept(pub String);

impl Default for Accept {
    fn default() -> Self {
        Accept("*/*".to_string())
    }
}

impl TypedHeader for Accept {
    const NAME: &'static str = HEADER_ACCEPT;

    fn value(&self) -> String {
        self.0.clone()
    }
}

/// Content codings, as used by Accept-Encoding and Content-Encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ContentCoding {
    Compress,
    Deflate,
    #[strum(to_string = "gzip", serialize = "x-gzip")]
    Gzip,
    #[default]
    Identity,
}

/// Codings the client is willing to receive, in preference order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptEncoding(pub Vec<ContentCoding>);

impl TypedHeader for AcceptEncoding {
    const NAME: &'static str = HEADER_ACCEPT_ENCODING;

    fn value(&self) -> String {
        self.0
            .iter()
            .map(|coding| coding.as_ref())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// `Authorization: Basic base64(name:password)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAuthorization {
    pub name: String,
    pub password: String,
}

impl BasicAuthorization {
    pub fn new(name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: password.into(),
        }
    }
}

impl TypedHeader for BasicAuthorization {
    const NAME: &'static str = HEADER_AUTHORIZATION;

    fn value(&self) -> String {
        let credentials = format!("{}:{}", self.name, self.password);
        format!("Basic {}", STANDARD.encode(credentials))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connection {
    #[default]
    Close,
    KeepAlive,
}

impl TypedHeader for Connection {
    const NAME: &'static str = HEADER_CONNECTION;

    fn value(&self) -> String {
        match self {
            Connection::Close => "close",
            Connection::KeepAlive => "keep-alive",
        }
        .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location(pub String);

impl TypedHeader for Location {
    const NAME: &'static str = HEADER_LOCATION;

    fn value(&self) -> String {
        self.0.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent(pub String);

impl TypedHeader for UserAgent {
    const NAME: &'static str = HEADER_USER_AGENT;

    fn value(&self) -> String {
        self.0.clone()
    }
}

/// Transfer codings. Only `chunked` changes how a body is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TransferCoding {
    Chunked,
    Compress,
    Deflate,
    #[strum(to_string = "gzip", serialize = "x-gzip")]
    Gzip,
    Identity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEncoding(pub Vec<TransferCoding>);

impl TransferEncoding {
    /// Parses a Transfer-Encoding value. Unknown codings are kept out of the
    /// list; `None` means nothing recognizable was present.
    pub fn parse(value: &str) -> Option<TransferEncoding> {
        let codings: Vec<TransferCoding> = value
            .split(',')
            .filter_map(|token| token.trim().parse().ok())
            .collect();
        (!codings.is_empty()).then_some(TransferEncoding(codings))
    }

    /// True when chunked is the final coding, which is what decides framing.
    pub fn is_chunked(value: &str) -> bool {
        value
            .rsplit(',')
            .next()
            .map(|last| last.trim().eq_ignore_ascii_case("chunked"))
            .unwrap_or(false)
    }
}

impl TypedHeader for TransferEncoding {
    const NAME: &'static str = HEADER_TRANSFER_ENCODING;

    fn value(&self) -> String {
        self.0
            .iter()
            .map(|coding| coding.as_ref())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLength(pub u64);

impl ContentLength {
    /// Parses a Content-Length value: ASCII digits only, surrounding
    /// whitespace ignored.
    pub fn parse(value: &str) -> Option<ContentLength> {
        let trimmed = value.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        trimmed.parse().ok().map(ContentLength)
    }
}

impl TypedHeader for ContentLength {
    const NAME: &'static str = HEADER_CONTENT_LENGTH;

    fn value(&self) -> String {
        self.0.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType(pub String);

impl TypedHeader for ContentType {
    const NAME: &'static str = HEADER_CONTENT_TYPE;

    fn value(&self) -> String {
        self.0.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentEncoding(pub ContentCoding);

impl ContentEncoding {
    pub fn coding(&self) -> ContentCoding {
        self.0
    }
}

impl TypedHeader for ContentEncoding {
    const NAME: &'static str = HEADER_CONTENT_ENCODING;

    fn value(&self) -> String {
        self.0.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_authorization_encodes_credentials() {
        let auth = BasicAuthorization::new("Aladdin", "open sesame");
        assert_eq!(BasicAuthorization::NAME, "Authorization");
        assert_eq!(auth.value(), "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
    }

    #[test]
    fn test_accept_defaults_to_everything() {
        assert_eq!(Accept::default().value(), "*/*");
    }

    #[test]
    fn test_accept_encoding_joins_codings() {
        let header = AcceptEncoding(vec![ContentCoding::Gzip, ContentCoding::Deflate]);
        assert_eq!(header.value(), "gzip, deflate");
    }

    #[test]
    fn test_connection_values() {
        assert_eq!(Connection::default().value(), "close");
        assert_eq!(Connection::KeepAlive.value(), "keep-alive");
    }

    #[test]
    fn test_content_coding_parses_aliases() {
        assert_eq!("GZIP".parse::<ContentCoding>(), Ok(ContentCoding::Gzip));
        assert_eq!("x-gzip".parse::<ContentCoding>(), Ok(ContentCoding::Gzip));
        assert_eq!("deflate".parse::<ContentCoding>(), Ok(ContentCoding::Deflate));
        assert!("br".parse::<ContentCoding>().is_err());
        assert_eq!(ContentCoding::Gzip.to_string(), "gzip");
    }

    #[test]
    fn test_transfer_encoding_chunked_must_be_last() {
        assert!(TransferEncoding::is_chunked("chunked"));
        assert!(TransferEncoding::is_chunked("gzip, Chunked"));
        assert!(!TransferEncoding::is_chunked("chunked, gzip"));
        assert!(!TransferEncoding::is_chunked(""));
        assert_eq!(
            TransferEncoding::parse("gzip, chunked"),
            Some(TransferEncoding(vec![
                TransferCoding::Gzip,
                TransferCoding::Chunked
            ]))
        );
        assert_eq!(TransferEncoding::parse("bogus"), None);
    }

    #[test]
    fn test_content_length_parse() {
        assert_eq!(ContentLength::parse(" 42 "), Some(ContentLength(42)));
        assert_eq!(ContentLength::parse("-1"), None);
        assert_eq!(ContentLength::parse("4x"), None);
        assert_eq!(ContentLength::parse(""), None);
    }
}
