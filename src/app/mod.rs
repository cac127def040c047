//! Command-line application support.
//!
//! This module provides target normalization, request construction from CLI
//! options, response rendering, and statistics printing used by the binary.

pub mod output;
pub mod request;
pub mod statistics;
pub mod url;

// Re-export public API
pub use output::{render_plain, ResponseSummary};
pub use request::build_request;
pub use statistics::print_statistics;
pub use url::normalize_target;
