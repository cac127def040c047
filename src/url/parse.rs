//! URL string parsing.
//!
//! Splits a URL into its components without normalizing anything except the
//! protocol, which is lowercased. Path, query and fragment are kept exactly
//! as written; path escapes are only checked for well-formedness.

use super::{Url, UrlError};

/// Components of a path reference (`/path?query#fragment`).
pub(super) struct Tail {
    pub path: String,
    pub query: String,
    pub fragment: String,
}

pub(super) fn parse_url(s: &str) -> Result<Url, UrlError> {
    if let Some(bad) = s.chars().find(|c| c.is_ascii_control() || *c == ' ') {
        return Err(UrlError::InvalidCharacter(bad));
    }

    let (protocol, rest) = split_scheme(s).ok_or(UrlError::MissingScheme)?;
    let rest = rest.strip_prefix("//").ok_or(UrlError::MissingHost)?;

    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);

    let (user_info, host_port) = match authority.rfind('@') {
        Some(at) => (&authority[..at], &authority[at + 1..]),
        None => ("", authority),
    };

    let (host, port_str, ipv6_host) = if let Some(bracketed) = host_port.strip_prefix('[') {
        let close = bracketed.find(']').ok_or(UrlError::MissingHost)?;
        let host = &bracketed[..close];
        let after = &bracketed[close + 1..];
        let port = match after.strip_prefix(':') {
            Some(port) => port,
            None if after.is_empty() => "",
            None => return Err(UrlError::InvalidPort(after.to_string())),
        };
        (host, port, true)
    } else {
        match host_port.split_once(':') {
            Some((host, port)) => (host, port, false),
            None => (host_port, "", false),
        }
    };

    if host.is_empty() {
        return Err(UrlError::MissingHost);
    }

    let port = parse_port(port_str)?;
    let Tail {
        path,
        query,
        fragment,
    } = parse_tail(tail)?;

    Ok(Url {
        protocol: protocol.to_ascii_lowercase(),
        user_info: user_info.to_string(),
        host: host.to_string(),
        port,
        path,
        query,
        fragment,
        ipv6_host,
    })
}

/// Parses the `path?query#fragment` part of a URL or a server-relative reference.
pub(super) fn parse_tail(tail: &str) -> Result<Tail, UrlError> {
    let (before_fragment, fragment) = match tail.split_once('#') {
        Some((before, fragment)) => (before, fragment),
        None => (tail, ""),
    };
    let (raw_path, query) = match before_fragment.split_once('?') {
        Some((path, query)) => (path, query),
        None => (before_fragment, ""),
    };

    Ok(Tail {
        path: check_escapes(raw_path)?,
        query: query.to_string(),
        fragment: fragment.to_string(),
    })
}

/// Splits `scheme:rest`, requiring an RFC 3986 scheme (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`).
pub(super) fn split_scheme(s: &str) -> Option<(&str, &str)> {
    let colon = s.find(':')?;
    let scheme = &s[..colon];
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        return None;
    }
    Some((scheme, &s[colon + 1..]))
}

fn parse_port(port: &str) -> Result<Option<u16>, UrlError> {
    if port.is_empty() {
        return Ok(None);
    }
    if !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(UrlError::InvalidPort(port.to_string()));
    }
    port.parse::<u16>()
        .map(Some)
        .map_err(|_| UrlError::InvalidPort(port.to_string()))
}

/// Every `%` must start a two-digit hex escape. Escapes may encode any byte.
fn check_escapes(raw: &str) -> Result<String, UrlError> {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(UrlError::InvalidEscape(raw.to_string()));
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    Ok(raw.to_string())
}
