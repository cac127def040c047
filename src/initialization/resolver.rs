//! DNS resolver initialization.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use trust_dns_resolver::config::{ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

use crate::config::DNS_ATTEMPTS;
use crate::error_handling::InitializationError;

/// Initializes the DNS resolver used by the connector.
///
/// Uses the system resolver configuration (`/etc/resolv.conf` on Unix) when it
/// can be read, falling back to the library defaults otherwise. Queries time
/// out after `timeout`, and `ndots` is forced to 0 so names are never expanded
/// with search domains.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if no configuration could
/// be built.
pub fn init_resolver(timeout: Duration) -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    let (config, mut opts) = match trust_dns_resolver::system_conf::read_system_conf() {
        Ok(system) => system,
        Err(e) => {
            debug!("System resolver configuration unavailable ({e}), using defaults");
            (ResolverConfig::default(), ResolverOpts::default())
        }
    };
    if config.name_servers().is_empty() {
        return Err(InitializationError::DnsResolverError(
            "no name servers configured".to_string(),
        ));
    }

    opts.timeout = timeout;
    opts.attempts = DNS_ATTEMPTS;
    opts.ndots = 0;

    Ok(Arc::new(TokioAsyncResolver::tokio(config, opts)))
}
