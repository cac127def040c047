//! Caller-facing entry points.
//!
//! A `Client` bundles what every session shares: the DNS resolver, the TLS
//! client configuration and the library `Config`. Cloning a client is cheap.

use std::sync::Arc;

use log::debug;
use rustls::ClientConfig;
use tokio::task::JoinHandle;
use trust_dns_resolver::TokioAsyncResolver;

use crate::config::{Config, HEADER_USER_AGENT};
use crate::error_handling::{InitializationError, SessionError, SessionFailure};
use crate::initialization::{init_resolver, init_tls_config};
use crate::message::{Request, Response};
use crate::session::Session;
use crate::url::Url;

pub(crate) struct Shared {
    pub(crate) resolver: Arc<TokioAsyncResolver>,
    pub(crate) tls: Arc<ClientConfig>,
    pub(crate) config: Config,
}

/// Shared context for starting request chains.
///
/// ```no_run
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// use http_session::{Client, Config, Request};
///
/// let client = Client::new(Config::default())?;
/// let response = client.send(Request::get("http://example.com/".parse()?)).await?;
/// println!("{} {}", response.status(), response.text());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Builds the resolver and TLS configuration for `config`.
    pub fn new(config: Config) -> Result<Self, InitializationError> {
        let resolver = init_resolver(config.dns_timeout)?;
        let tls = init_tls_config()?;
        Ok(Self::with_parts(config, resolver, tls))
    }

    /// Assembles a client from prebuilt parts, e.g. a TLS config trusting a
    /// private root.
    pub fn with_parts(
        config: Config,
        resolver: Arc<TokioAsyncResolver>,
        tls: Arc<ClientConfig>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                resolver,
                tls,
                config,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    /// Creates an unstarted session for `request`, adding the configured
    /// User-Agent when the request has none.
    pub fn session(&self, mut request: Request) -> Session {
        if let Some(agent) = &self.shared.config.user_agent {
            if !request.headers().contains(HEADER_USER_AGENT) {
                request.append_header(HEADER_USER_AGENT, agent.clone());
            }
        }
        Session::new(Arc::clone(&self.shared), request)
    }

    /// Runs a request chain to completion.
    pub async fn send(&self, request: Request) -> Result<Response, SessionFailure> {
        self.session(request).start().await
    }

    /// Spawns a request chain on the current runtime. Exactly one of the two
    /// callbacks runs, once.
    pub fn start<C, E>(&self, request: Request, on_complete: C, on_error: E) -> JoinHandle<()>
    where
        C: FnOnce(Response) + Send + 'static,
        E: FnOnce(SessionError, Url, Option<Response>) + Send + 'static,
    {
        let mut session = self.session(request);
        tokio::spawn(async move {
            match session.start().await {
                Ok(response) => on_complete(response),
                Err(failure) => {
                    debug!("Delivering failure for {}", failure.url);
                    on_error(failure.error, failure.url, failure.response)
                }
            }
        })
    }
}
