//! Configuration constants.
//!
//! This module defines the constants used throughout the client engine,
//! including default ports, network timeouts, and parse limits applied to
//! untrusted response bytes.

use std::time::Duration;

// Default ports by protocol
/// Port used for `http` URLs that do not name one.
pub const DEFAULT_HTTP_PORT: u16 = 80;
/// Port used for `https` URLs that do not name one.
pub const DEFAULT_HTTPS_PORT: u16 = 443;
/// Port used for `ftp` URLs that do not name one.
///
/// The engine never speaks FTP, but the URL model still reports its default
/// port so that reserialization stays faithful.
pub const DEFAULT_FTP_PORT: u16 = 21;

// Redirect handling
/// Maximum number of redirect hops a request follows unless told otherwise.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

// Network operation timeouts
/// DNS query timeout in seconds
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// TCP connection timeout in seconds, applied to each resolved endpoint
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;
/// DNS resolver retry attempts
pub const DNS_ATTEMPTS: usize = 2;

/// Default per-request timeout used by the CLI (the library default is disabled).
pub const CLI_DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// Response parsing limits
/// Initial capacity of a session's read buffer.
pub const READ_BUFFER_SIZE: usize = 8 * 1024;
/// Longest status line accepted before failing with `MalformedStatusLine`.
pub const MAX_STATUS_LINE_LENGTH: usize = 8 * 1024;
/// Largest header block (all header lines plus the blank line) accepted.
/// Guards against header bombs from hostile servers.
pub const MAX_HEADER_BLOCK_SIZE: usize = 64 * 1024;
/// Longest chunk-size line (size plus extensions) accepted.
pub const MAX_CHUNK_LINE_LENGTH: usize = 4 * 1024;
/// Maximum number of interim (1xx) responses skipped before giving up.
pub const MAX_INTERIM_RESPONSES: usize = 8;
/// Blank lines tolerated ahead of a status line.
pub const MAX_LEADING_BLANK_LINES: usize = 8;

/// Value sent in `Accept-Encoding` when the caller did not set one.
pub const DEFAULT_ACCEPT_ENCODING: &str = "gzip, deflate";

/// Default User-Agent string for requests issued through a `Client`.
pub const DEFAULT_USER_AGENT: &str = concat!("http_session/", env!("CARGO_PKG_VERSION"));
