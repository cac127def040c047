//! Header and content model.
//!
//! `HeaderSet` is an ordered collection of (name, value) pairs kept sorted by
//! name, with at most one entry per name: inserting an existing name replaces
//! its value. Names compare ignoring ASCII case, so servers that spell
//! `content-length` in lower case are still found by `Content-Length`.
//!
//! A `HeaderSet` also owns the optional body buffer it describes, which is how
//! `Content` binds its Length/Type/Encoding triple to the bytes.

mod content;
mod typed;

use std::cmp::Ordering;
use std::fmt;

use bytes::Bytes;
use log::debug;

pub use content::{Content, MultipartFormData, Part};
pub use typed::{
    Accept, AcceptEncoding, BasicAuthorization, Connection, ContentCoding, ContentEncoding,
    ContentLength, ContentType, Location, TransferCoding, TransferEncoding, TypedHeader,
    UserAgent,
};

/// One header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Sorted, de-duplicated headers plus an optional body buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    headers: Vec<Header>,
    content: Option<Bytes>,
}

/// Orders header names ignoring ASCII case.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Result<usize, usize> {
        self.headers
            .binary_search_by(|header| compare_names(&header.name, name))
    }

    /// Inserts a header, keeping the set sorted. An existing entry with the
    /// same name keeps its spelling and takes the new value.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Ok(index) => {
                debug!("Header {name} exists, replacing value");
                self.headers[index].value = value;
            }
            Err(index) => self.headers.insert(index, Header { name, value }),
        }
    }

    /// Inserts a typed header value.
    pub fn append_typed<H: TypedHeader>(&mut self, header: H) {
        self.append(H::NAME, header.value());
    }

    /// Binds a body to this set, writing its Length, Type and (when not
    /// identity) Encoding headers.
    pub fn set_content(&mut self, content: Content) {
        let (length, content_type, encoding, body) = content.into_parts();
        self.append_typed(length);
        self.append_typed(content_type);
        if encoding.coding() != ContentCoding::Identity {
            self.append_typed(encoding);
        }
        self.content = Some(body);
    }

    /// Looks a header up by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&Header> {
        self.position(name).ok().map(|index| &self.headers[index])
    }

    /// Value of the named header.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.find(name).map(|header| header.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_ok()
    }

    /// Removes the named header, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name)
            .ok()
            .map(|index| self.headers.remove(index).value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.headers.iter()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// The body buffer bound to these headers, if any.
    pub fn content(&self) -> Option<&Bytes> {
        self.content.as_ref()
    }

    /// Replaces the body buffer without touching any header.
    pub fn set_body(&mut self, body: Bytes) {
        self.content = Some(body);
    }

    /// Drops the body buffer without touching any header.
    pub fn clear_body(&mut self) {
        self.content = None;
    }
}

impl fmt::Display for HeaderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for header in &self.headers {
            write!(f, "{}: {}\r\n", header.name, header.value)?;
        }
        Ok(())
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut set = HeaderSet::new();
        for (name, value) in iter {
            set.append(name, value);
        }
        set
    }
}
