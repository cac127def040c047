//! Response rendering for the command line.

use serde::Serialize;

use crate::error_handling::SessionFailure;
use crate::message::Response;

/// One line of `--json` output.
#[derive(Debug, Serialize)]
pub struct ResponseSummary {
    pub target: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub redirects: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub body_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponseSummary {
    pub fn from_response(target: &str, response: &Response, include_headers: bool) -> Self {
        Self {
            target: target.to_string(),
            url: response.url().to_string(),
            status: Some(response.status()),
            reason: Some(response.reason().to_string()),
            redirects: response.redirects(),
            headers: if include_headers {
                response
                    .headers()
                    .iter()
                    .map(|h| (h.name.clone(), h.value.clone()))
                    .collect()
            } else {
                Vec::new()
            },
            content_type: response.content_type().map(str::to_string),
            body_bytes: response.body().len(),
            body: Some(response.text().into_owned()),
            error: None,
        }
    }

    pub fn from_failure(target: &str, failure: &SessionFailure) -> Self {
        let partial = failure.response.as_ref();
        Self {
            target: target.to_string(),
            url: failure.url.to_string(),
            status: partial.map(Response::status),
            reason: partial.map(|r| r.reason().to_string()),
            redirects: partial.map(Response::redirects).unwrap_or(0),
            headers: Vec::new(),
            content_type: partial.and_then(|r| r.content_type().map(str::to_string)),
            body_bytes: 0,
            body: None,
            error: Some(failure.error.to_string()),
        }
    }
}

/// Plain rendering: optional status line and headers, then the body text.
pub fn render_plain(response: &Response, include_headers: bool) -> String {
    let mut out = String::new();
    if include_headers {
        out.push_str(&format!(
            "{} {} {}\r\n",
            response.version(),
            response.status(),
            response.reason()
        ));
        out.push_str(&response.headers().to_string());
        out.push_str("\r\n");
    }
    out.push_str(&response.text());
    out
}
