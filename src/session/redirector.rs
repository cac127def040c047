//! Redirect policy.
//!
//! Given a 3xx response, decides whether the chain may continue and builds the
//! request for the next hop. `Location` values are classified as:
//!
//! - `//host/path`: scheme-relative, resolved from scratch
//! - `/path?query`: server-relative, replayed against the same endpoint
//! - `scheme://...`: absolute, resolved from scratch
//! - anything else: joined onto the current URL, resolved from scratch

use log::info;

use crate::config::{
    HEADER_AUTHORIZATION, HEADER_CONTENT_ENCODING, HEADER_CONTENT_LENGTH, HEADER_CONTENT_TYPE,
    HEADER_LOCATION,
};
use crate::error_handling::SessionError;
use crate::message::{Method, Request, Response};
use crate::url::{Url, UrlError};

/// The next hop of a redirect chain.
#[derive(Debug)]
pub(crate) struct Hop {
    pub(crate) request: Request,
    /// The target shares the current endpoint; no new resolution needed.
    pub(crate) same_endpoint: bool,
}

/// Plans the hop after `followed` hops have already been taken.
pub(crate) fn next_hop(
    request: &Request,
    response: &Response,
    followed: usize,
) -> Result<Hop, SessionError> {
    let status = response.status();
    let limit = request.redirect_limit();
    if !limit.allows(followed) {
        return Err(SessionError::RedirectBudgetExceeded {
            status,
            limit: limit.cap().unwrap_or(followed),
        });
    }

    let location = response
        .header(HEADER_LOCATION)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(SessionError::ProtocolStatusError { status })?;

    let current = request.url();
    let (target, same_endpoint) = resolve_location(current, location)?;

    let mut next = request.clone();
    if status == 303 && request.method() != Method::Head {
        next.set_method(Method::Get);
        let headers = next.headers_mut();
        headers.clear_body();
        headers.remove(HEADER_CONTENT_LENGTH);
        headers.remove(HEADER_CONTENT_TYPE);
        headers.remove(HEADER_CONTENT_ENCODING);
    }
    if !target.host().eq_ignore_ascii_case(current.host()) {
        next.headers_mut().remove(HEADER_AUTHORIZATION);
    }

    info!(
        "Following {status} redirect {} of chain: {current} -> {target}",
        followed + 1
    );
    next.set_url(target);
    Ok(Hop {
        request: next,
        same_endpoint,
    })
}

fn resolve_location(current: &Url, location: &str) -> Result<(Url, bool), SessionError> {
    if location.starts_with("//") {
        let absolute = format!("{}:{location}", current.protocol());
        return Ok((Url::parse(&absolute)?, false));
    }
    if location.starts_with('/') {
        let mut target = current.clone();
        target.set_path_reference(location)?;
        return Ok((target, true));
    }
    if Url::has_scheme(location) {
        return Ok((Url::parse(location)?, false));
    }

    let joined = ::url::Url::parse(&current.to_string())
        .and_then(|base| base.join(location))
        .map_err(|_| UrlError::InvalidReference(location.to_string()))?;
    Ok((Url::parse(joined.as_str())?, false))
}
