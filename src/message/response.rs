use std::borrow::Cow;

use bytes::Bytes;

use super::HttpVersion;
use crate::config::HEADER_CONTENT_TYPE;
use crate::headers::HeaderSet;
use crate::url::Url;

/// A response, as far as it has been parsed.
///
/// Responses handed to `on_complete` are fully materialized: the body has
/// been reassembled and decoded. Responses attached to a failure may stop
/// after the headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    status: u16,
    reason: String,
    version: HttpVersion,
    headers: HeaderSet,
    url: Url,
    redirects: usize,
    compressed: bool,
}

impl Response {
    pub(crate) fn new(url: Url) -> Self {
        Self {
            url,
            ..Default::default()
        }
    }

    pub(crate) fn set_status_line(&mut self, version: HttpVersion, status: u16, reason: String) {
        self.version = version;
        self.status = status;
        self.reason = reason;
    }

    pub(crate) fn set_headers(&mut self, headers: HeaderSet) {
        self.headers = headers;
    }

    pub(crate) fn set_body(&mut self, body: Bytes, compressed: bool) {
        self.headers.set_body(body);
        self.compressed = compressed;
    }

    pub(crate) fn set_redirects(&mut self, redirects: usize) {
        self.redirects = redirects;
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    /// Header value by name, ignoring ASCII case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(HEADER_CONTENT_TYPE)
    }

    /// The decoded body. Empty until the body has been finalized.
    pub fn body(&self) -> &[u8] {
        self.headers.content().map(|body| body.as_ref()).unwrap_or(&[])
    }

    /// A cheap handle to the body buffer.
    pub fn bytes(&self) -> Bytes {
        self.headers.content().cloned().unwrap_or_default()
    }

    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.body())
    }

    /// The URL this response was served from (the last hop of a redirect chain).
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Redirect hops followed before this response.
    pub fn redirects(&self) -> usize {
        self.redirects
    }

    /// True when the body arrived content-encoded and was decoded.
    pub fn was_compressed(&self) -> bool {
        self.compressed
    }
}
