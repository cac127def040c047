//! Status line and header line parsing.

use crate::error_handling::SessionError;
use crate::message::HttpVersion;

/// Parses `HTTP/<major>.<minor> <code>[ <reason>]`.
pub(crate) fn parse_status_line(line: &str) -> Result<(HttpVersion, u16, String), SessionError> {
    let malformed = || SessionError::MalformedStatusLine(line.to_string());

    let (version, rest) = line.split_once(' ').ok_or_else(malformed)?;
    let numbers = version.strip_prefix("HTTP/").ok_or_else(malformed)?;
    let (major, minor) = numbers.split_once('.').ok_or_else(malformed)?;
    let version = HttpVersion {
        major: parse_digit(major).ok_or_else(malformed)?,
        minor: parse_digit(minor).ok_or_else(malformed)?,
    };

    let rest = rest.trim_start_matches(' ');
    let (code, reason) = rest.split_once(' ').unwrap_or((rest, ""));
    if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let status: u16 = code.parse().map_err(|_| malformed())?;
    if status < 100 {
        return Err(malformed());
    }

    Ok((version, status, reason.trim().to_string()))
}

fn parse_digit(s: &str) -> Option<u8> {
    match s.as_bytes() {
        [d] if d.is_ascii_digit() => Some(d - b'0'),
        _ => None,
    }
}

/// Parses `Name: value`. The name must be a non-empty token.
pub(crate) fn parse_header_line(line: &str) -> Result<(&str, &str), SessionError> {
    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| SessionError::MalformedHeaders(format!("missing colon in `{line}`")))?;
    if name.is_empty() || !name.bytes().all(is_token_byte) {
        return Err(SessionError::MalformedHeaders(format!(
            "invalid header name in `{line}`"
        )));
    }
    Ok((name, value.trim()))
}

/// True for lines continuing the previous header (obsolete line folding).
pub(crate) fn is_continuation(line: &str) -> bool {
    line.starts_with(' ') || line.starts_with('\t')
}

fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
