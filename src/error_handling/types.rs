//! Error type definitions.
//!
//! This module defines the session error taxonomy, the failure value handed to
//! callers, initialization errors, and the flat classification used for
//! statistics.

use std::io;
use std::time::Duration;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::message::Response;
use crate::url::{Url, UrlError};

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error building the TLS client configuration.
    #[error("TLS configuration error: {0}")]
    TlsConfigError(#[from] rustls::Error),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// Everything that can end a session chain unsuccessfully.
///
/// Each pipeline stage reports the first error it observes. The only automatic
/// retry is the connector moving on to the next resolved endpoint.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The request URL (or a redirect target) could not be parsed.
    #[error("malformed URL: {0}")]
    MalformedUrl(#[from] UrlError),

    /// The URL names a protocol the engine does not speak.
    #[error("unsupported protocol `{0}`")]
    UnsupportedProtocol(String),

    /// Host name resolution failed or produced no endpoints.
    #[error("failed to resolve {host}: {reason}")]
    ResolutionError { host: String, reason: String },

    /// Every resolved endpoint refused or timed out.
    #[error("failed to connect to {host}: {source}")]
    ConnectError {
        host: String,
        #[source]
        source: io::Error,
    },

    /// TLS handshake or certificate verification failed.
    #[error("TLS handshake with {host} failed: {source}")]
    TlsHandshakeError {
        host: String,
        #[source]
        source: io::Error,
    },

    /// Writing the serialized request failed.
    #[error("failed to write request: {0}")]
    WriteError(#[source] io::Error),

    /// Reading the response failed at the transport level.
    #[error("failed to read response: {0}")]
    ReadError(#[source] io::Error),

    /// The first response line is not `HTTP/<major>.<minor> <code> <reason>`.
    #[error("malformed status line: {0}")]
    MalformedStatusLine(String),

    /// The header block could not be parsed.
    #[error("malformed response headers: {0}")]
    MalformedHeaders(String),

    /// The server answered with a status the engine does not complete with.
    #[error("unexpected HTTP status {status}")]
    ProtocolStatusError { status: u16 },

    /// Chunk framing or the compressed payload is invalid.
    #[error("failed to decode response body: {0}")]
    DecodeError(String),

    /// The session deadline fired before the exchange finished.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// A redirect arrived after the request's hop budget was spent.
    #[error("redirect budget of {limit} exhausted (status {status})")]
    RedirectBudgetExceeded { status: u16, limit: usize },

    /// A session was started twice.
    #[error("session already started")]
    AlreadyOpen,
}

impl SessionError {
    /// Flat classification of this error, used for statistics.
    pub fn error_type(&self) -> ErrorType {
        match self {
            SessionError::MalformedUrl(_) => ErrorType::MalformedUrl,
            SessionError::UnsupportedProtocol(_) => ErrorType::UnsupportedProtocol,
            SessionError::ResolutionError { .. } => ErrorType::ResolutionError,
            SessionError::ConnectError { .. } => ErrorType::ConnectError,
            SessionError::TlsHandshakeError { .. } => ErrorType::TlsHandshakeError,
            SessionError::WriteError(_) => ErrorType::WriteError,
            SessionError::ReadError(_) => ErrorType::ReadError,
            SessionError::MalformedStatusLine(_) => ErrorType::MalformedStatusLine,
            SessionError::MalformedHeaders(_) => ErrorType::MalformedHeaders,
            SessionError::ProtocolStatusError { status } => match status {
                400..=499 => ErrorType::ClientErrorStatus,
                500..=599 => ErrorType::ServerErrorStatus,
                _ => ErrorType::ProtocolStatusError,
            },
            SessionError::DecodeError(_) => ErrorType::DecodeError,
            SessionError::Timeout(_) => ErrorType::Timeout,
            SessionError::RedirectBudgetExceeded { .. } => ErrorType::RedirectBudgetExceeded,
            SessionError::AlreadyOpen => ErrorType::AlreadyOpen,
        }
    }

    /// Status code carried by status-driven errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            SessionError::ProtocolStatusError { status }
            | SessionError::RedirectBudgetExceeded { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if this is the deadline firing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Timeout(_))
    }
}

/// The error half of the caller contract: the error, the URL being fetched
/// when it happened, and whatever response had been parsed by then.
#[derive(Error, Debug)]
#[error("{error} (url: {url})")]
pub struct SessionFailure {
    #[source]
    pub error: SessionError,
    pub url: Url,
    pub response: Option<Response>,
}

impl SessionFailure {
    pub fn new(error: SessionError, url: Url, response: Option<Response>) -> Self {
        Self {
            error,
            url,
            response,
        }
    }
}

/// Types of errors that can end a session chain.
///
/// This enum is a flat, iterable mirror of `SessionError` with status errors
/// split by class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    // URL errors
    MalformedUrl,
    UnsupportedProtocol,
    // Network errors
    ResolutionError,
    ConnectError,
    TlsHandshakeError,
    WriteError,
    ReadError,
    Timeout,
    // Protocol errors
    MalformedStatusLine,
    MalformedHeaders,
    DecodeError,
    // Status errors
    ClientErrorStatus, // 4xx
    ServerErrorStatus, // 5xx
    ProtocolStatusError,
    RedirectBudgetExceeded,
    // Programmer errors
    AlreadyOpen,
}

/// Types of informational metrics recorded per completed chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    HttpRedirect,      // At least one redirect was followed
    HttpsRedirect,     // The chain ended on https after starting elsewhere
    MultipleRedirects, // More than one redirect in the chain
    CompressedBody,    // Body arrived with a Content-Encoding
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::MalformedUrl => "Malformed URL",
            ErrorType::UnsupportedProtocol => "Unsupported protocol",
            ErrorType::ResolutionError => "DNS resolution error",
            ErrorType::ConnectError => "TCP connect error",
            ErrorType::TlsHandshakeError => "TLS handshake error",
            ErrorType::WriteError => "Request write error",
            ErrorType::ReadError => "Response read error",
            ErrorType::Timeout => "Timeout",
            ErrorType::MalformedStatusLine => "Malformed status line",
            ErrorType::MalformedHeaders => "Malformed headers",
            ErrorType::DecodeError => "Body decode error",
            ErrorType::ClientErrorStatus => "Client error status (4xx)",
            ErrorType::ServerErrorStatus => "Server error status (5xx)",
            ErrorType::ProtocolStatusError => "Unexpected status",
            ErrorType::RedirectBudgetExceeded => "Redirect budget exceeded",
            ErrorType::AlreadyOpen => "Session already started",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::HttpRedirect => "HTTP redirect",
            InfoType::HttpsRedirect => "Redirect to HTTPS",
            InfoType::MultipleRedirects => "Multiple redirects",
            InfoType::CompressedBody => "Compressed body",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_error_type_as_str_is_unique() {
        let mut seen = std::collections::HashSet::new();
        for error_type in ErrorType::iter() {
            assert!(!error_type.as_str().is_empty());
            assert!(seen.insert(error_type.as_str()), "{error_type:?}");
        }
    }

    #[test]
    fn test_status_errors_split_by_class() {
        assert_eq!(
            SessionError::ProtocolStatusError { status: 404 }.error_type(),
            ErrorType::ClientErrorStatus
        );
        assert_eq!(
            SessionError::ProtocolStatusError { status: 503 }.error_type(),
            ErrorType::ServerErrorStatus
        );
        assert_eq!(
            SessionError::ProtocolStatusError { status: 101 }.error_type(),
            ErrorType::ProtocolStatusError
        );
    }

    #[test]
    fn test_status_accessor() {
        let err = SessionError::RedirectBudgetExceeded {
            status: 302,
            limit: 1,
        };
        assert_eq!(err.status(), Some(302));
        assert_eq!(err.error_type(), ErrorType::RedirectBudgetExceeded);
        assert_eq!(SessionError::AlreadyOpen.status(), None);
    }

    #[test]
    fn test_timeout_display() {
        let err = SessionError::Timeout(Duration::from_millis(100));
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "request timed out after 100ms");
    }

    #[test]
    fn test_failure_display_includes_url() {
        let url = Url::parse("http://example.test/a").expect("valid url");
        let failure = SessionFailure::new(SessionError::AlreadyOpen, url, None);
        assert_eq!(
            failure.to_string(),
            "session already started (url: http://example.test/a)"
        );
    }
}
