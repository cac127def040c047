//! Request construction from command-line options.

use anyhow::{bail, Context, Result};

use crate::config::Opt;
use crate::headers::Content;
use crate::message::{RedirectLimit, Request};

use super::url::normalize_target;

/// Builds the request for one target: method, extra headers, optional body,
/// redirect budget and timeout.
pub fn build_request(opt: &Opt, target: &str) -> Result<Request> {
    let url = normalize_target(target).with_context(|| format!("Invalid URL `{target}`"))?;

    let mut request = Request::new(opt.method, url)
        .with_timeout(opt.timeout())
        .with_redirect_limit(RedirectLimit::from(opt.redirect_cap()));

    for raw in &opt.headers {
        let Some((name, value)) = raw.split_once(':') else {
            bail!("Header `{raw}` is not in `Name: value` form");
        };
        let name = name.trim();
        if name.is_empty() {
            bail!("Header `{raw}` has an empty name");
        }
        request.append_header(name, value.trim());
    }

    if let Some(data) = &opt.data {
        request.set_content(Content::new(opt.content_type.clone(), data.clone()));
    }

    Ok(request)
}
