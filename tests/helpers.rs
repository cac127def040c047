// Shared test helpers: scripted TCP servers and client construction.
//
// Scripted servers give exact control over the bytes on the wire, which the
// framing, redirect and timeout tests need and a mock HTTP framework hides.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use http_session::{Client, Config};

/// Builds a client with default configuration.
#[allow(dead_code)] // Used by other test files
pub fn test_client() -> Client {
    Client::new(Config::default()).expect("Failed to build client")
}

/// Reads one request (head plus Content-Length body) from `stream`.
#[allow(dead_code)]
pub async fn read_request(stream: &mut TcpStream) -> Vec<u8> {
    let mut data = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return data,
            Ok(n) => data.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&data[..head_end]).to_ascii_lowercase();
    let body_len = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while data.len() < head_end + body_len {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => data.extend_from_slice(&chunk[..n]),
        }
    }
    data
}

/// A server that answers successive connections with successive scripts,
/// closing each connection after writing. Received requests are forwarded
/// on the returned channel.
#[allow(dead_code)]
pub async fn scripted_server(
    scripts: Vec<Vec<u8>>,
) -> (SocketAddr, mpsc::UnboundedReceiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for script in scripts {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            let request = read_request(&mut stream).await;
            let _ = tx.send(request);
            let _ = stream.write_all(&script).await;
            let _ = stream.shutdown().await;
        }
    });

    (addr, rx)
}

/// A server that accepts connections and never writes a byte.
#[allow(dead_code)]
pub async fn silent_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    addr
}

/// A plain-text server that answers immediately on accept, whatever the
/// client sends. Used to break TLS handshakes.
#[allow(dead_code)]
pub async fn eager_plain_server(reply: &'static [u8]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = stream.write_all(reply).await;
                tokio::time::sleep(Duration::from_millis(200)).await;
            });
        }
    });
    addr
}

/// `HTTP/1.1 <status>` response with a Content-Length body.
#[allow(dead_code)]
pub fn fixed_response(status: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut out = format!("HTTP/1.1 {status}\r\n");
    for (name, value) in headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str(&format!("Content-Length: {}\r\n\r\n", body.len()));
    let mut bytes = out.into_bytes();
    bytes.extend_from_slice(body);
    bytes
}

/// A redirect response pointing at `location`.
#[allow(dead_code)]
pub fn redirect_response(status: &str, location: &str) -> Vec<u8> {
    fixed_response(status, &[("Location", location)], b"")
}
