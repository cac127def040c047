//! Transport selection and the TLS handshake.
//!
//! A plain transport passes the socket through unchanged; a TLS transport
//! runs the rustls handshake, which verifies the certificate chain and the
//! server name. Both produce a `MaybeTlsStream`, so the rest of the pipeline
//! does not care which one it got.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use log::debug;
use rustls::pki_types::ServerName;
use rustls::ClientConfig;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;

use crate::error_handling::SessionError;

/// How bytes travel once the socket is open.
#[derive(Clone)]
pub enum Transport {
    Plain,
    Tls(Arc<ClientConfig>),
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Plain => f.write_str("Plain"),
            Transport::Tls(_) => f.write_str("Tls"),
        }
    }
}

impl Transport {
    /// Performs the handshake for this transport. Plain transports succeed
    /// immediately.
    pub(crate) async fn handshake(
        &self,
        tcp: TcpStream,
        host: &str,
        timeout: Duration,
    ) -> Result<MaybeTlsStream, SessionError> {
        let config = match self {
            Transport::Plain => return Ok(MaybeTlsStream::Plain(tcp)),
            Transport::Tls(config) => Arc::clone(config),
        };

        let handshake_error = |source: io::Error| SessionError::TlsHandshakeError {
            host: host.to_string(),
            source,
        };

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| handshake_error(io::Error::new(io::ErrorKind::InvalidInput, e)))?;

        let connector = TlsConnector::from(config);
        let stream = tokio::time::timeout(timeout, connector.connect(server_name, tcp))
            .await
            .map_err(|_| {
                handshake_error(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("handshake timed out after {timeout:?}"),
                ))
            })?
            .map_err(handshake_error)?;

        let (_, connection) = stream.get_ref();
        debug!(
            "TLS established with {host} ({:?}, {:?})",
            connection.protocol_version(),
            connection.negotiated_cipher_suite().map(|suite| suite.suite())
        );
        Ok(MaybeTlsStream::Tls(Box::new(stream)))
    }
}

/// A connected socket, TLS-wrapped or not.
pub enum MaybeTlsStream {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl MaybeTlsStream {
    pub fn is_tls(&self) -> bool {
        matches!(self, MaybeTlsStream::Tls(_))
    }
}

impl AsyncRead for MaybeTlsStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(stream) => Pin::new(stream).poll_read(cx, buf),
            MaybeTlsStream::Tls(stream) => Pin::new(stream.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for MaybeTlsStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(stream) => Pin::new(stream).poll_write(cx, buf),
            MaybeTlsStream::Tls(stream) => Pin::new(stream.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(stream) => Pin::new(stream).poll_flush(cx),
            MaybeTlsStream::Tls(stream) => Pin::new(stream.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            MaybeTlsStream::Plain(stream) => Pin::new(stream).poll_shutdown(cx),
            MaybeTlsStream::Tls(stream) => Pin::new(stream.as_mut()).poll_shutdown(cx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::initialization::init_tls_config;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    async fn pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let (client, server) = tokio::join!(TcpStream::connect(addr), listener.accept());
        (client.expect("connect"), server.expect("accept").0)
    }

    #[tokio::test]
    async fn test_plain_passes_through() {
        let (client, mut server) = pair().await;
        let mut stream = Transport::Plain
            .handshake(client, "localhost", Duration::from_secs(1))
            .await
            .expect("plain");
        assert!(!stream.is_tls());
        stream.write_all(b"ping").await.expect("write");
        let mut buf = [0u8; 4];
        server.read_exact(&mut buf).await.expect("read");
        assert_eq!(&buf, b"ping");
    }

    #[tokio::test]
    async fn test_tls_against_plain_server_fails() {
        let (client, mut server) = pair().await;
        tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            let _ = server.read(&mut buf).await;
            let _ = server
                .write_all(b"HTTP/1.1 400 Bad Request\r\nContent-Length: 0\r\n\r\n")
                .await;
        });
        let transport = Transport::Tls(init_tls_config().expect("tls"));
        let result = transport
            .handshake(client, "localhost", Duration::from_secs(2))
            .await;
        assert!(matches!(
            result,
            Err(SessionError::TlsHandshakeError { .. })
        ));
    }
}
