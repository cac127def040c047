//! http_session library: an asynchronous HTTP/1.1 client engine
//!
//! Given a URL and a request description, the engine resolves the host,
//! connects over plain TCP or TLS, writes the request, and parses the response
//! incrementally: status line, headers, and a body framed by Content-Length,
//! chunked transfer coding or connection close. Gzip and deflate bodies are
//! decoded, redirects are followed up to a per-request budget, and a per-hop
//! deadline cancels whatever stage is in flight.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use http_session::{Client, Config, RedirectLimit, Request};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(Config::default())?;
//! let request = Request::get("https://example.com/".parse()?)
//!     .with_timeout(Duration::from_secs(10))
//!     .with_redirect_limit(RedirectLimit::Limited(5));
//!
//! match client.send(request).await {
//!     Ok(response) => println!("{} {} bytes", response.status(), response.body().len()),
//!     Err(failure) => eprintln!("{failure}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The callback form fires exactly one of two closures per request chain:
//!
//! ```no_run
//! # use http_session::{Client, Config, Request};
//! # async fn demo(client: Client, request: Request) {
//! let handle = client.start(
//!     request,
//!     |response| println!("done: {}", response.status()),
//!     |error, url, _partial| eprintln!("{url}: {error}"),
//! );
//! let _ = handle.await;
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod app;
mod client;
pub mod config;
mod error_handling;
pub mod headers;
pub mod initialization;
pub mod message;
pub mod responder;
pub mod session;
pub mod url;

// Re-export public API
pub use client::Client;
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{
    update_error_stats, update_response_stats, ErrorType, InfoType, InitializationError,
    ProcessingStats, SessionError, SessionFailure,
};
pub use headers::{Content, HeaderSet, MultipartFormData, Part};
pub use message::{HttpVersion, Method, RedirectLimit, Request, Response};
pub use session::Session;
pub use url::{Url, UrlError};
