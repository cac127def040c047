use std::io::{self, Write};
use std::time::Duration;

use bytes::Bytes;

use super::{HttpVersion, Method, RedirectLimit};
use crate::config::{DEFAULT_ACCEPT_ENCODING, HEADER_ACCEPT_ENCODING, HEADER_HOST};
use crate::headers::{Accept, Connection, Content, HeaderSet, TypedHeader};
use crate::url::Url;

/// Everything needed to perform one logical request chain.
///
/// ```
/// use http_session::message::{Method, Request};
/// use http_session::url::Url;
///
/// let url: Url = "http://example.test/a".parse().unwrap();
/// let wire = Request::new(Method::Get, url).to_bytes();
/// assert!(wire.starts_with(b"GET /a HTTP/1.1\r\nHost: example.test\r\n"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    url: Url,
    version: HttpVersion,
    headers: HeaderSet,
    redirect_limit: RedirectLimit,
    timeout: Duration,
}

impl Request {
    /// A request with `Accept: */*` and `Connection: close` preset.
    pub fn new(method: Method, url: Url) -> Self {
        let mut headers = HeaderSet::new();
        headers.append_typed(Accept::default());
        headers.append_typed(Connection::Close);
        Self {
            method,
            url,
            version: HttpVersion::default(),
            headers,
            redirect_limit: RedirectLimit::default(),
            timeout: Duration::ZERO,
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: Url, content: Content) -> Self {
        Self::new(Method::Post, url).with_content(content)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_typed_header<H: TypedHeader>(mut self, header: H) -> Self {
        self.headers.append_typed(header);
        self
    }

    pub fn with_content(mut self, content: Content) -> Self {
        self.headers.set_content(content);
        self
    }

    /// Overall deadline per hop. Zero disables it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_redirect_limit(mut self, limit: RedirectLimit) -> Self {
        self.redirect_limit = limit;
        self
    }

    pub fn with_version(mut self, version: HttpVersion) -> Self {
        self.version = version;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn set_method(&mut self, method: Method) {
        self.method = method;
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn set_url(&mut self, url: Url) {
        self.url = url;
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderSet {
        &mut self.headers
    }

    pub fn append_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.append(name, value);
    }

    pub fn set_content(&mut self, content: Content) {
        self.headers.set_content(content);
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.headers.content()
    }

    pub fn redirect_limit(&self) -> RedirectLimit {
        self.redirect_limit
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Writes the request in wire form: request line, Host, the sorted
    /// headers, a default Accept-Encoding when none was set, the blank line,
    /// and the body if any.
    pub fn process<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        write!(
            sink,
            "{} {} {}\r\n",
            self.method,
            self.url.request_target(),
            self.version
        )?;

        let host = match self.headers.get(HEADER_HOST) {
            Some(explicit) => explicit.to_string(),
            None => self.url.host_header(),
        };
        write!(sink, "{HEADER_HOST}: {host}\r\n")?;

        for header in self.headers.iter() {
            if header.name.eq_ignore_ascii_case(HEADER_HOST) {
                continue;
            }
            write!(sink, "{}: {}\r\n", header.name, header.value)?;
        }
        if !self.headers.contains(HEADER_ACCEPT_ENCODING) {
            write!(sink, "{HEADER_ACCEPT_ENCODING}: {DEFAULT_ACCEPT_ENCODING}\r\n")?;
        }
        sink.write_all(b"\r\n")?;

        if let Some(body) = self.headers.content() {
            sink.write_all(body)?;
        }
        Ok(())
    }

    /// The serialized request.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(256);
        // Writing into a Vec cannot fail.
        let _ = self.process(&mut buffer);
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::{BasicAuthorization, MultipartFormData, Part};

    fn url(s: &str) -> Url {
        s.parse().expect("valid url")
    }

    fn wire(request: &Request) -> String {
        String::from_utf8(request.to_bytes()).expect("utf-8 request")
    }

    #[test]
    fn test_get_wire_format() {
        let text = wire(&Request::get(url("http://example.test/a")));
        assert!(text.starts_with("GET /a HTTP/1.1\r\nHost: example.test\r\n"));
        assert!(text.contains("Accept-Encoding: gzip, deflate\r\n"));
        assert!(text.contains("Accept: */*\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_headers_emitted_sorted() {
        let request = Request::get(url("http://example.test/"))
            .with_header("Zeta", "z")
            .with_header("Alpha", "a");
        let text = wire(&request);
        let alpha = text.find("Alpha: a").expect("alpha");
        let accept = text.find("Accept: */*").expect("accept");
        let zeta = text.find("Zeta: z").expect("zeta");
        assert!(accept < alpha);
        assert!(alpha < zeta);
    }

    #[test]
    fn test_host_includes_only_non_default_port() {
        let text = wire(&Request::get(url("https://example.test:8443/x?q=1")));
        assert!(text.starts_with("GET /x?q=1 HTTP/1.1\r\nHost: example.test:8443\r\n"));

        let text = wire(&Request::get(url("https://example.test:443/")));
        assert!(text.contains("Host: example.test\r\n"));
    }

    #[test]
    fn test_caller_accept_encoding_not_duplicated() {
        let request =
            Request::get(url("http://example.test/")).with_header("accept-encoding", "identity");
        let text = wire(&request);
        assert!(text.contains("accept-encoding: identity\r\n"));
        assert!(!text.contains("gzip, deflate"));
    }

    #[test]
    fn test_post_writes_content_triple_and_body() {
        let request = Request::post(
            url("http://example.test/submit"),
            Content::new("application/json", r#"{"a":1}"#),
        );
        let text = wire(&request);
        assert!(text.starts_with("POST /submit HTTP/1.1\r\n"));
        assert!(text.contains("Content-Length: 7\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n"));
        assert!(text.ends_with("\r\n\r\n{\"a\":1}"));
    }

    #[test]
    fn test_multipart_body_length_matches_header() {
        let mut form = MultipartFormData::with_boundary("B0undary");
        form.append_part(Part::form_field("name", "value"));
        let expected = form.encoded_len();
        let request = Request::post(url("http://example.test/upload"), form.into());

        let bytes = request.to_bytes();
        let split = bytes
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("header terminator");
        let body = &bytes[split + 4..];
        assert_eq!(body.len(), expected);
        assert!(wire(&request).contains(&format!("Content-Length: {expected}\r\n")));
        assert!(wire(&request).contains("multipart/form-data; boundary=B0undary"));
    }

    #[test]
    fn test_explicit_host_header_wins() {
        let request = Request::get(url("http://10.0.0.1/")).with_header("host", "virtual.test");
        let text = wire(&request);
        assert!(text.contains("Host: virtual.test\r\n"));
        assert_eq!(text.matches("virtual.test").count(), 1);
    }

    #[test]
    fn test_version_and_typed_header() {
        let request = Request::new(Method::Head, url("http://example.test"))
            .with_version(HttpVersion::HTTP_10)
            .with_typed_header(BasicAuthorization::new("u", "p"));
        let text = wire(&request);
        assert!(text.starts_with("HEAD / HTTP/1.0\r\n"));
        assert!(text.contains("Authorization: Basic dTpw\r\n"));
    }
}
