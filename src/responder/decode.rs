//! Content-Encoding decoding.

use std::io::Read;

use bytes::Bytes;
use flate2::read::{DeflateDecoder, MultiGzDecoder, ZlibDecoder};
use log::debug;

use crate::error_handling::SessionError;
use crate::headers::ContentCoding;

/// Undoes every coding listed in a Content-Encoding value, last applied
/// first. Returns the decoded bytes and whether any real decoding happened.
pub(crate) fn decode_body(encoding: &str, body: Bytes) -> Result<(Bytes, bool), SessionError> {
    let mut decoded = body;
    let mut compressed = false;
    for token in encoding.rsplit(',').map(str::trim).filter(|t| !t.is_empty()) {
        let coding: ContentCoding = token.parse().map_err(|_| {
            SessionError::DecodeError(format!("unsupported content encoding `{token}`"))
        })?;
        decoded = match coding {
            ContentCoding::Identity => decoded,
            ContentCoding::Gzip => {
                compressed = true;
                gunzip(&decoded)?
            }
            ContentCoding::Deflate => {
                compressed = true;
                inflate(&decoded)?
            }
            ContentCoding::Compress => {
                return Err(SessionError::DecodeError(
                    "unsupported content encoding `compress`".to_string(),
                ))
            }
        };
    }
    Ok((decoded, compressed))
}

fn gunzip(data: &[u8]) -> Result<Bytes, SessionError> {
    let mut out = Vec::with_capacity(data.len() * 4);
    MultiGzDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| SessionError::DecodeError(format!("gzip: {e}")))?;
    Ok(out.into())
}

/// `deflate` is meant to be zlib-wrapped, but some servers send raw deflate.
fn inflate(data: &[u8]) -> Result<Bytes, SessionError> {
    let mut out = Vec::with_capacity(data.len() * 4);
    if ZlibDecoder::new(data).read_to_end(&mut out).is_ok() {
        return Ok(out.into());
    }
    debug!("Body is not zlib-wrapped, retrying as raw deflate");
    out.clear();
    DeflateDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| SessionError::DecodeError(format!("deflate: {e}")))?;
    Ok(out.into())
}
