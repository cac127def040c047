//! Request and response values.
//!
//! A `Request` is owned by the caller and cloned into every Session of a
//! redirect chain. A `Response` is filled in incrementally by the responder
//! and handed to the caller once finalized.

mod request;
mod response;

use std::fmt;

use strum_macros::{AsRefStr, Display, EnumString};

use crate::config::DEFAULT_MAX_REDIRECTS;

pub use request::Request;
pub use response::Response;

/// Request methods the engine serializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Method {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
}

impl Method {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

/// `HTTP/<major>.<minor>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpVersion {
    pub major: u8,
    pub minor: u8,
}

impl HttpVersion {
    pub const HTTP_10: HttpVersion = HttpVersion { major: 1, minor: 0 };
    pub const HTTP_11: HttpVersion = HttpVersion { major: 1, minor: 1 };
}

impl Default for HttpVersion {
    fn default() -> Self {
        HttpVersion::HTTP_11
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/{}.{}", self.major, self.minor)
    }
}

/// How many redirect hops a request chain may follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectLimit {
    /// Follow at most this many hops. `Limited(0)` never follows.
    Limited(usize),
    Unlimited,
}

impl RedirectLimit {
    /// Whether another hop may be followed after `followed` hops.
    pub fn allows(&self, followed: usize) -> bool {
        match self {
            RedirectLimit::Limited(max) => followed < *max,
            RedirectLimit::Unlimited => true,
        }
    }

    /// The cap reported in errors; unlimited chains never report one.
    pub fn cap(&self) -> Option<usize> {
        match self {
            RedirectLimit::Limited(max) => Some(*max),
            RedirectLimit::Unlimited => None,
        }
    }
}

impl Default for RedirectLimit {
    fn default() -> Self {
        RedirectLimit::Limited(DEFAULT_MAX_REDIRECTS)
    }
}

impl From<Option<usize>> for RedirectLimit {
    fn from(cap: Option<usize>) -> Self {
        cap.map_or(RedirectLimit::Unlimited, RedirectLimit::Limited)
    }
}
