//! Error handling and processing statistics.
//!
//! This module provides:
//! - The session error taxonomy and the caller-facing failure value
//! - Initialization error types
//! - Processing statistics tracking (errors and info metrics)
//! - Categorization of finished chains into statistics
//!
//! Outcomes are categorized into:
//! - **Errors**: Chains that ended in a `SessionFailure`
//! - **Info**: Informational metrics (redirects, compressed bodies)

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{update_error_stats, update_response_stats};
pub use stats::ProcessingStats;
pub use types::{ErrorType, InfoType, InitializationError, SessionError, SessionFailure};
