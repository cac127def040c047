//! TLS client configuration.

use std::sync::Arc;

use rustls::crypto::ring::default_provider;
use rustls::{ClientConfig, RootCertStore};

use crate::error_handling::InitializationError;

/// Builds the client configuration shared by every TLS session: the
/// webpki root store, safe default protocol versions, no client auth.
/// Hostname verification is part of rustls' default verifier.
pub fn init_tls_config() -> Result<Arc<ClientConfig>, InitializationError> {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder_with_provider(Arc::new(default_provider()))
        .with_safe_default_protocol_versions()?
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(Arc::new(config))
}
