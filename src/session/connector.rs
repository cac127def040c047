//! Host resolution and TCP connection.
//!
//! `Resolving -> Connecting -> Open | Failed`. Endpoints are tried in the
//! order the resolver returns them; the first successful connect wins.

use std::io;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use log::debug;
use tokio::net::TcpStream;
use trust_dns_resolver::TokioAsyncResolver;

use crate::error_handling::SessionError;

pub(crate) struct Connector<'a> {
    resolver: &'a TokioAsyncResolver,
    connect_timeout: Duration,
}

impl<'a> Connector<'a> {
    pub(crate) fn new(resolver: &'a TokioAsyncResolver, connect_timeout: Duration) -> Self {
        Self {
            resolver,
            connect_timeout,
        }
    }

    /// Resolves `host` into endpoints. IP literals skip the resolver.
    pub(crate) async fn resolve(
        &self,
        host: &str,
        port: u16,
    ) -> Result<Vec<SocketAddr>, SessionError> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![SocketAddr::new(ip, port)]);
        }

        let lookup = self
            .resolver
            .lookup_ip(host)
            .await
            .map_err(|e| SessionError::ResolutionError {
                host: host.to_string(),
                reason: e.to_string(),
            })?;
        let endpoints: Vec<SocketAddr> = lookup.iter().map(|ip| SocketAddr::new(ip, port)).collect();
        if endpoints.is_empty() {
            return Err(SessionError::ResolutionError {
                host: host.to_string(),
                reason: "no addresses found".to_string(),
            });
        }
        debug!("Resolved {host} to {endpoints:?}");
        Ok(endpoints)
    }

    /// Connects to each endpoint in turn. The last failure is reported when
    /// all of them fail.
    pub(crate) async fn connect_any(
        &self,
        host: &str,
        endpoints: &[SocketAddr],
    ) -> Result<(TcpStream, SocketAddr), SessionError> {
        let mut last_error =
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no endpoints to connect to");
        for endpoint in endpoints {
            match self.open(*endpoint).await {
                Ok(stream) => return Ok((stream, *endpoint)),
                Err(e) => {
                    debug!("Connect to {endpoint} failed: {e}");
                    last_error = e;
                }
            }
        }
        Err(SessionError::ConnectError {
            host: host.to_string(),
            source: last_error,
        })
    }

    /// Connects to an endpoint known from an earlier hop, skipping resolution.
    pub(crate) async fn connect_endpoint(
        &self,
        host: &str,
        endpoint: SocketAddr,
    ) -> Result<TcpStream, SessionError> {
        self.open(endpoint)
            .await
            .map_err(|source| SessionError::ConnectError {
                host: host.to_string(),
                source,
            })
    }

    async fn open(&self, endpoint: SocketAddr) -> io::Result<TcpStream> {
        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(endpoint))
            .await
            .map_err(|_| {
                io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("connect timed out after {:?}", self.connect_timeout),
                )
            })??;
        stream.set_nodelay(true)?;
        debug!("Connected to {endpoint}");
        Ok(stream)
    }
}
