//! Request bodies: raw bytes with their metadata, or a multipart form.

use bytes::{BufMut, Bytes, BytesMut};
use rand::distr::Alphanumeric;
use rand::Rng;

use super::typed::{ContentCoding, ContentEncoding, ContentLength, ContentType, TypedHeader};

const BOUNDARY_LENGTH: usize = 24;

/// Body bytes bound to their Length/Type/Encoding triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    length: ContentLength,
    content_type: ContentType,
    encoding: ContentEncoding,
    body: Bytes,
}

impl Content {
    /// Identity-encoded content. Length is the byte count of `body`.
    pub fn new(content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self::with_encoding(content_type, body, ContentCoding::Identity)
    }

    /// Content whose bytes are already encoded with `coding`.
    pub fn with_encoding(
        content_type: impl Into<String>,
        body: impl Into<Bytes>,
        coding: ContentCoding,
    ) -> Self {
        let body = body.into();
        Self {
            length: ContentLength(body.len() as u64),
            content_type: ContentType(content_type.into()),
            encoding: ContentEncoding(coding),
            body,
        }
    }

    pub fn length(&self) -> u64 {
        self.length.0
    }

    pub fn content_type(&self) -> &str {
        &self.content_type.0
    }

    pub fn encoding(&self) -> ContentCoding {
        self.encoding.coding()
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub(super) fn into_parts(self) -> (ContentLength, ContentType, ContentEncoding, Bytes) {
        (self.length, self.content_type, self.encoding, self.body)
    }
}

/// One part of a multipart/form-data body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Part {
    headers: Vec<(String, String)>,
    data: Bytes,
}

impl Part {
    pub fn new() -> Self {
        Self::default()
    }

    /// A form field part carrying `Content-Disposition: form-data; name="..."`.
    pub fn form_field(name: &str, value: impl Into<Bytes>) -> Self {
        let mut part = Part::new();
        part.append_header(
            "Content-Disposition",
            format!("form-data; name=\"{name}\""),
        );
        part.set_body(value);
        part
    }

    /// Part headers keep insertion order and may repeat.
    pub fn append_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    pub fn append_typed<H: TypedHeader>(&mut self, header: H) {
        self.append_header(H::NAME, header.value());
    }

    pub fn set_body(&mut self, data: impl Into<Bytes>) {
        self.data = data.into();
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    fn encoded_len(&self) -> usize {
        let headers: usize = self
            .headers
            .iter()
            .map(|(name, value)| name.len() + 2 + value.len() + 2)
            .sum();
        headers + 2 + self.data.len() + 2
    }
}

/// A multipart/form-data body builder.
///
/// Framing:
///
/// ```text
/// --boundary CRLF
/// Name: value CRLF      (per part header)
/// CRLF
/// data CRLF
/// ...
/// --boundary-- CRLF
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartFormData {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for MultipartFormData {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartFormData {
    /// A builder with a random alphanumeric boundary.
    pub fn new() -> Self {
        let suffix: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(BOUNDARY_LENGTH)
            .map(char::from)
            .collect();
        Self::with_boundary(format!("----http_session{suffix}"))
    }

    /// A builder with a caller-chosen boundary. The caller is responsible for
    /// it not occurring inside any part.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn append_part(&mut self, part: Part) -> &mut Self {
        self.parts.push(part);
        self
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Exact size of the serialized body.
    pub fn encoded_len(&self) -> usize {
        let delimiter = 2 + self.boundary.len() + 2;
        let parts: usize = self
            .parts
            .iter()
            .map(|part| delimiter + part.encoded_len())
            .sum();
        parts + 2 + self.boundary.len() + 2 + 2
    }

    /// Serializes every part followed by the closing delimiter.
    pub fn encode(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.encoded_len());
        for part in &self.parts {
            out.put_slice(b"--");
            out.put_slice(self.boundary.as_bytes());
            out.put_slice(b"\r\n");
            for (name, value) in &part.headers {
                out.put_slice(name.as_bytes());
                out.put_slice(b": ");
                out.put_slice(value.as_bytes());
                out.put_slice(b"\r\n");
            }
            out.put_slice(b"\r\n");
            out.put_slice(&part.data);
            out.put_slice(b"\r\n");
        }
        out.put_slice(b"--");
        out.put_slice(self.boundary.as_bytes());
        out.put_slice(b"--\r\n");
        out.freeze()
    }
}

impl From<MultipartFormData> for Content {
    fn from(form: MultipartFormData) -> Self {
        Content::new(form.content_type(), form.encode())
    }
}
