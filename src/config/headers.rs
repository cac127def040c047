//! HTTP header name constants.
//!
//! Names are written in their canonical spelling. Lookups in a `HeaderSet`
//! ignore ASCII case, so these match whatever casing a server sends.

/// Host header (always emitted first by the request serializer)
pub const HEADER_HOST: &str = "Host";
/// Accept header
pub const HEADER_ACCEPT: &str = "Accept";
/// Accept-Encoding header
pub const HEADER_ACCEPT_ENCODING: &str = "Accept-Encoding";
/// Authorization header
pub const HEADER_AUTHORIZATION: &str = "Authorization";
/// Connection header
pub const HEADER_CONNECTION: &str = "Connection";
/// User-Agent header
pub const HEADER_USER_AGENT: &str = "User-Agent";
/// Location header (redirect target)
pub const HEADER_LOCATION: &str = "Location";

// Content triple
/// Content-Length header
pub const HEADER_CONTENT_LENGTH: &str = "Content-Length";
/// Content-Type header
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
/// Content-Encoding header
pub const HEADER_CONTENT_ENCODING: &str = "Content-Encoding";

// Framing
/// Transfer-Encoding header
pub const HEADER_TRANSFER_ENCODING: &str = "Transfer-Encoding";
