//! Target normalization for command-line input.

use crate::url::{Url, UrlError};

/// Maximum accepted length of a command-line target.
const MAX_URL_LENGTH: usize = 2048;

/// Normalizes a command-line target into a `Url`.
///
/// Bare hosts such as `example.com/path` get an `http://` prefix. Overlong
/// targets are rejected before parsing.
pub fn normalize_target(input: &str) -> Result<Url, UrlError> {
    let input = input.trim();
    if input.len() > MAX_URL_LENGTH {
        return Err(UrlError::InvalidReference(format!(
            "{}... exceeds {MAX_URL_LENGTH} characters",
            input.chars().take(50).collect::<String>()
        )));
    }

    if input.contains("://") || (Url::has_scheme(input) && !looks_like_host_port(input)) {
        Url::parse(input)
    } else {
        Url::parse(&format!("http://{input}"))
    }
}

/// `localhost:8080/x` has a "scheme" by the grammar, but is meant as host:port.
fn looks_like_host_port(input: &str) -> bool {
    input
        .split_once(':')
        .map(|(_, rest)| rest.bytes().next().is_some_and(|b| b.is_ascii_digit()))
        .unwrap_or(false)
}
