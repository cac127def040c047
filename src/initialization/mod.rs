//! Shared resource setup.
//!
//! This module provides functions to initialize the resources a `Client`
//! shares across sessions:
//! - Logger
//! - DNS resolver
//! - TLS client configuration
//!
//! All initialization functions return `InitializationError` on failure.

mod logger;
mod resolver;
mod tls;

use rustls::crypto::{ring::default_provider, CryptoProvider};

// Re-export public API
pub use logger::init_logger_with;
pub use resolver::init_resolver;
pub use tls::init_tls_config;

/// Initializes the process-wide crypto provider for TLS operations.
///
/// The TLS config built by `init_tls_config` names its provider explicitly, so
/// this only matters for other rustls users in the same process.
pub fn init_crypto_provider() {
    // Reinstalling is harmless, so the result is ignored
    let _ = CryptoProvider::install_default(default_provider());
}
