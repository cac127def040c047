//! Session orchestration.
//!
//! A `Session` is one attempt at a full exchange:
//!
//! ```text
//! connect -> handshake -> write request -> read response
//!                                          |-> complete
//!                                          |-> error
//!                                          `-> redirect: new Session, start over
//! ```
//!
//! Exactly one stage is in flight at a time and each one is raced against
//! the session deadline. On a redirect the session is replaced in place by
//! the next hop's session, which drops the old socket.

mod connector;
mod deadline;
mod handshaker;
mod redirector;
mod requester;

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, warn};

use crate::client::Shared;
use crate::error_handling::{SessionError, SessionFailure};
use crate::message::{Request, Response};
use crate::responder::{Disposition, Responder};

use connector::Connector;
use deadline::Deadline;
use redirector::next_hop;
use requester::write_request;

pub use handshaker::{MaybeTlsStream, Transport};

enum Step {
    Complete(Response),
    Replay(Box<Session>),
}

/// One connection attempt within a request chain.
pub struct Session {
    shared: Arc<Shared>,
    request: Request,
    /// Endpoint to reuse instead of resolving, set for same-origin replays.
    endpoint: Option<SocketAddr>,
    stream: Option<MaybeTlsStream>,
    redirects: usize,
    started: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("url", &self.request.url().to_string())
            .field("endpoint", &self.endpoint)
            .field("redirects", &self.redirects)
            .field("started", &self.started)
            .finish()
    }
}

impl Session {
    pub(crate) fn new(shared: Arc<Shared>, request: Request) -> Self {
        Self {
            shared,
            request,
            endpoint: None,
            stream: None,
            redirects: 0,
            started: false,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Endpoint of the current hop: the one connected to, or the one a
    /// same-origin replay will reuse without resolving.
    pub fn endpoint(&self) -> Option<SocketAddr> {
        self.endpoint
    }

    /// Redirect hops this chain has followed so far.
    pub fn redirects(&self) -> usize {
        self.redirects
    }

    /// Runs the chain to its single terminal outcome. A session can be
    /// started once; a second call fails with `AlreadyOpen`.
    pub async fn start(&mut self) -> Result<Response, SessionFailure> {
        if self.started || self.stream.is_some() {
            return Err(SessionFailure::new(
                SessionError::AlreadyOpen,
                self.request.url().clone(),
                None,
            ));
        }
        loop {
            match self.run().await? {
                Step::Complete(response) => return Ok(response),
                Step::Replay(next) => *self = *next,
            }
        }
    }

    async fn run(&mut self) -> Result<Step, SessionFailure> {
        self.started = true;
        let deadline = Deadline::arm(self.request.timeout());
        let mut responder = Responder::new(self.request.method(), self.request.url().clone());

        let outcome = self.exchange(&deadline, &mut responder).await;
        // The socket is done with either way; a replay opens its own.
        self.stream = None;

        match outcome {
            Ok(Disposition::Complete) => {
                let mut response = responder.into_response();
                response.set_redirects(self.redirects);
                debug!(
                    "Completed {} with {} ({} bytes)",
                    self.request.url(),
                    response.status(),
                    response.body().len()
                );
                Ok(Step::Complete(response))
            }
            Ok(Disposition::Redirect) => {
                let mut response = responder.into_response();
                response.set_redirects(self.redirects);
                match next_hop(&self.request, &response, self.redirects) {
                    Ok(hop) => Ok(Step::Replay(Box::new(self.replay(hop)))),
                    Err(error) => Err(self.fail(error, Some(response))),
                }
            }
            Err(error) => {
                let partial = responder.partial().map(|mut response| {
                    response.set_redirects(self.redirects);
                    response
                });
                Err(self.fail(error, partial))
            }
        }
    }

    async fn exchange(
        &mut self,
        deadline: &Deadline,
        responder: &mut Responder,
    ) -> Result<Disposition, SessionError> {
        let url = self.request.url().clone();
        let transport = match url.protocol() {
            "http" => Transport::Plain,
            "https" => Transport::Tls(Arc::clone(&self.shared.tls)),
            other => return Err(SessionError::UnsupportedProtocol(other.to_string())),
        };
        let host = url.host();
        let config = &self.shared.config;
        let connector = Connector::new(&self.shared.resolver, config.connect_timeout);

        let tcp = match self.endpoint {
            Some(endpoint) => {
                debug!("Reusing endpoint {endpoint} for {url}");
                deadline
                    .guard(connector.connect_endpoint(host, endpoint))
                    .await?
            }
            None => {
                let endpoints = deadline.guard(connector.resolve(host, url.port())).await?;
                let (tcp, endpoint) = deadline
                    .guard(connector.connect_any(host, &endpoints))
                    .await?;
                self.endpoint = Some(endpoint);
                tcp
            }
        };

        let stream = deadline
            .guard(transport.handshake(tcp, host, config.handshake_timeout))
            .await?;
        let stream = self.stream.insert(stream);

        deadline.guard(write_request(stream, &self.request)).await?;
        deadline.guard(responder.read(stream)).await
    }

    fn replay(&self, hop: redirector::Hop) -> Session {
        let mut next = Session::new(Arc::clone(&self.shared), hop.request);
        next.redirects = self.redirects + 1;
        if hop.same_endpoint {
            next.endpoint = self.endpoint;
        }
        next
    }

    fn fail(&self, error: SessionError, response: Option<Response>) -> SessionFailure {
        if error.is_timeout() {
            warn!("{} timed out", self.request.url());
        } else {
            debug!("{} failed: {error}", self.request.url());
        }
        SessionFailure::new(error, self.request.url().clone(), response)
    }
}
