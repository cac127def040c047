//! Request serialization and write.

use log::debug;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error_handling::SessionError;
use crate::message::Request;

/// Serializes `request` and writes all of it. `write_all` retries partial
/// writes, so the only failure is the transport's.
pub(crate) async fn write_request<S>(stream: &mut S, request: &Request) -> Result<(), SessionError>
where
    S: AsyncWrite + Unpin + ?Sized,
{
    let wire = request.to_bytes();
    stream
        .write_all(&wire)
        .await
        .map_err(SessionError::WriteError)?;
    stream.flush().await.map_err(SessionError::WriteError)?;
    debug!(
        "Wrote {} bytes for {} {}",
        wire.len(),
        request.method(),
        request.url()
    );
    Ok(())
}
