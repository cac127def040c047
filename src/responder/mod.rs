//! Response state machine.
//!
//! The responder parses a response incrementally from any `AsyncRead`,
//! buffering only what the current state needs:
//!
//! ```text
//! StatusLine -> Headers -> FixedBody | UntilClose | ChunkSize <-> ChunkData
//!                                                 -> Finalize
//! ```
//!
//! Interim `1xx` responses loop back to `StatusLine`. A 3xx hands control to
//! the redirector without reading a body; statuses outside 2xx/3xx fail with
//! the headers attached.
//!
//! End of stream is the success signal for close-delimited bodies, and is
//! tolerated (with a warning) for short fixed-length and unterminated chunked
//! bodies. A TLS peer closing without `close_notify` surfaces as
//! `UnexpectedEof` and is treated the same as a clean end of stream.

mod chunked;
mod decode;
mod parse;

use std::io;

use bytes::{Buf, BytesMut};
use log::{debug, warn};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::{
    HEADER_CONTENT_ENCODING, HEADER_CONTENT_LENGTH, HEADER_TRANSFER_ENCODING,
    MAX_CHUNK_LINE_LENGTH, MAX_HEADER_BLOCK_SIZE, MAX_INTERIM_RESPONSES, MAX_LEADING_BLANK_LINES,
    MAX_STATUS_LINE_LENGTH, READ_BUFFER_SIZE,
};
use crate::error_handling::SessionError;
use crate::headers::{ContentLength, HeaderSet, TransferEncoding};
use crate::message::{Method, Response};
use crate::url::Url;

use chunked::{match_terminator, parse_chunk_size, Terminator};
use parse::{is_continuation, parse_header_line, parse_status_line};

/// How a parsed response leaves the responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The body is final and the response can be delivered.
    Complete,
    /// A 3xx was received; the redirector takes over.
    Redirect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StatusLine,
    Headers,
    FixedBody { remaining: u64 },
    UntilClose,
    ChunkSize,
    ChunkData { remaining: usize },
    ChunkTerminator,
    Trailers,
    Finalize,
    Done,
}

/// Which parse limit a line read is subject to.
#[derive(Clone, Copy)]
enum LineKind {
    Status,
    Header,
    Chunk,
}

impl LineKind {
    fn too_long(self, limit: usize) -> SessionError {
        match self {
            LineKind::Status => {
                SessionError::MalformedStatusLine(format!("status line exceeds {limit} bytes"))
            }
            LineKind::Header => {
                SessionError::MalformedHeaders(format!("header block exceeds {limit} bytes"))
            }
            LineKind::Chunk => {
                SessionError::DecodeError(format!("chunk size line exceeds {limit} bytes"))
            }
        }
    }

    /// Header values may carry obs-text, so a header line that is not UTF-8
    /// is read as Latin-1. The name is still checked as a token later.
    fn decode(self, line: &[u8]) -> Result<String, SessionError> {
        match (std::str::from_utf8(line), self) {
            (Ok(text), _) => Ok(text.to_string()),
            (Err(_), LineKind::Header) => Ok(line.iter().map(|&b| char::from(b)).collect()),
            (Err(_), LineKind::Status) => Err(SessionError::MalformedStatusLine(
                "non-UTF-8 status line".into(),
            )),
            (Err(_), LineKind::Chunk) => {
                Err(SessionError::DecodeError("non-UTF-8 chunk size line".into()))
            }
        }
    }
}

/// Incremental response parser for one hop.
#[derive(Debug)]
pub struct Responder {
    method: Method,
    state: State,
    buffer: BytesMut,
    body: BytesMut,
    headers: HeaderSet,
    last_header_name: Option<String>,
    header_bytes: usize,
    blank_lines: usize,
    interim: usize,
    eof: bool,
    response: Response,
}

impl Responder {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            state: State::StatusLine,
            buffer: BytesMut::with_capacity(READ_BUFFER_SIZE),
            body: BytesMut::new(),
            headers: HeaderSet::new(),
            last_header_name: None,
            header_bytes: 0,
            blank_lines: 0,
            interim: 0,
            eof: false,
            response: Response::new(url),
        }
    }

    /// The response as parsed so far.
    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn into_response(self) -> Response {
        self.response
    }

    /// The partial response to attach to a failure: present once a status
    /// line has been parsed.
    pub fn partial(&self) -> Option<Response> {
        (self.response.status() != 0).then(|| self.response.clone())
    }

    /// Drives the state machine until the response is complete or a redirect
    /// is due. Only the reads suspend.
    pub async fn read<S>(&mut self, stream: &mut S) -> Result<Disposition, SessionError>
    where
        S: AsyncRead + Unpin + ?Sized,
    {
        loop {
            match self.state {
                State::StatusLine => {
                    let Some(line) = self
                        .read_line(stream, LineKind::Status, MAX_STATUS_LINE_LENGTH)
                        .await?
                    else {
                        return Err(SessionError::ReadError(io::Error::new(
                            io::ErrorKind::UnexpectedEof,
                            "connection closed before the status line",
                        )));
                    };
                    // Tolerate a few blank lines left over from a previous message.
                    if line.is_empty() {
                        self.blank_lines += 1;
                        if self.blank_lines > MAX_LEADING_BLANK_LINES {
                            return Err(SessionError::MalformedStatusLine(format!(
                                "more than {MAX_LEADING_BLANK_LINES} blank lines before the status line"
                            )));
                        }
                        continue;
                    }
                    self.blank_lines = 0;
                    let (version, status, reason) = parse_status_line(&line)?;
                    debug!("Status line: {version} {status} {reason}");
                    self.response.set_status_line(version, status, reason);
                    self.headers = HeaderSet::new();
                    self.header_bytes = 0;
                    self.state = State::Headers;
                }
                State::Headers => {
                    let budget = MAX_HEADER_BLOCK_SIZE.saturating_sub(self.header_bytes);
                    let Some(line) = self.read_line(stream, LineKind::Header, budget).await?
                    else {
                        return Err(SessionError::MalformedHeaders(
                            "connection closed inside the header block".to_string(),
                        ));
                    };
                    self.header_bytes += line.len() + 2;
                    if self.header_bytes > MAX_HEADER_BLOCK_SIZE {
                        return Err(LineKind::Header.too_long(MAX_HEADER_BLOCK_SIZE));
                    }
                    if line.is_empty() {
                        if let Some(disposition) = self.end_of_headers()? {
                            return Ok(disposition);
                        }
                    } else {
                        self.header_line(&line)?;
                    }
                }
                State::FixedBody { remaining } => {
                    if remaining == 0 {
                        if !self.buffer.is_empty() {
                            debug!(
                                "Discarding {} bytes past Content-Length",
                                self.buffer.len()
                            );
                            self.buffer.clear();
                        }
                        self.state = State::Finalize;
                        continue;
                    }
                    if self.buffer.is_empty() && self.fill(stream).await? == 0 {
                        warn!("Connection closed with {remaining} bytes of body outstanding");
                        self.state = State::Finalize;
                        continue;
                    }
                    let take = remaining.min(self.buffer.len() as u64) as usize;
                    self.body.extend_from_slice(&self.buffer.split_to(take));
                    self.state = State::FixedBody {
                        remaining: remaining - take as u64,
                    };
                }
                State::UntilClose => {
                    if !self.buffer.is_empty() {
                        let available = self.buffer.split();
                        self.body.extend_from_slice(&available);
                    }
                    if self.fill(stream).await? == 0 {
                        self.state = State::Finalize;
                    }
                }
                State::ChunkSize => {
                    let Some(line) = self
                        .read_line(stream, LineKind::Chunk, MAX_CHUNK_LINE_LENGTH)
                        .await?
                    else {
                        warn!("Connection closed before the terminating chunk");
                        self.state = State::Finalize;
                        continue;
                    };
                    let size = parse_chunk_size(&line)?;
                    self.state = if size == 0 {
                        State::Trailers
                    } else {
                        State::ChunkData { remaining: size }
                    };
                }
                State::ChunkData { remaining } => {
                    if remaining == 0 {
                        self.state = State::ChunkTerminator;
                        continue;
                    }
                    if self.buffer.is_empty() && self.fill(stream).await? == 0 {
                        warn!("Connection closed inside a chunk, {remaining} bytes short");
                        self.state = State::Finalize;
                        continue;
                    }
                    let take = remaining.min(self.buffer.len());
                    self.body.extend_from_slice(&self.buffer.split_to(take));
                    self.state = State::ChunkData {
                        remaining: remaining - take,
                    };
                }
                State::ChunkTerminator => match match_terminator(&self.buffer) {
                    Terminator::Found(len) => {
                        self.buffer.advance(len);
                        self.state = State::ChunkSize;
                    }
                    Terminator::Missing => {
                        return Err(SessionError::DecodeError(
                            "chunk payload not followed by CRLF".to_string(),
                        ));
                    }
                    Terminator::Incomplete => {
                        if self.fill(stream).await? == 0 {
                            warn!("Connection closed after chunk payload");
                            self.buffer.clear();
                            self.state = State::Finalize;
                        }
                    }
                },
                State::Trailers => {
                    match self
                        .read_line(stream, LineKind::Chunk, MAX_CHUNK_LINE_LENGTH)
                        .await?
                    {
                        Some(line) if !line.is_empty() => debug!("Ignoring trailer `{line}`"),
                        _ => self.state = State::Finalize,
                    }
                }
                State::Finalize => {
                    self.finalize()?;
                    return Ok(Disposition::Complete);
                }
                State::Done => return Ok(Disposition::Complete),
            }
        }
    }

    fn header_line(&mut self, line: &str) -> Result<(), SessionError> {
        if is_continuation(line) {
            let Some(last) = self.last_header_name.take() else {
                return Err(SessionError::MalformedHeaders(
                    "continuation line before any header".to_string(),
                ));
            };
            let folded = match self.headers.get(&last) {
                Some(previous) => format!("{previous} {}", line.trim()),
                None => line.trim().to_string(),
            };
            self.headers.append(last.clone(), folded);
            self.last_header_name = Some(last);
            return Ok(());
        }
        let (name, value) = parse_header_line(line)?;
        if self.headers.contains(name) {
            warn!("Duplicate header {name}, keeping the last value");
        }
        self.headers.append(name, value);
        self.last_header_name = Some(name.to_string());
        Ok(())
    }

    /// Chooses what happens after the blank line. `None` means keep reading.
    fn end_of_headers(&mut self) -> Result<Option<Disposition>, SessionError> {
        self.last_header_name = None;
        let status = self.response.status();

        if (100..200).contains(&status) && status != 101 {
            self.interim += 1;
            if self.interim > MAX_INTERIM_RESPONSES {
                return Err(SessionError::MalformedStatusLine(format!(
                    "more than {MAX_INTERIM_RESPONSES} interim responses"
                )));
            }
            debug!("Skipping interim {status} response");
            self.state = State::StatusLine;
            return Ok(None);
        }

        self.response.set_headers(std::mem::take(&mut self.headers));

        if status == 304 {
            self.state = State::Finalize;
            return Ok(None);
        }
        if (300..400).contains(&status) {
            self.state = State::Done;
            return Ok(Some(Disposition::Redirect));
        }
        if !(200..300).contains(&status) {
            return Err(SessionError::ProtocolStatusError { status });
        }
        if self.method == Method::Head || status == 204 {
            self.state = State::Finalize;
            return Ok(None);
        }

        let headers = self.response.headers();
        self.state = if let Some(value) = headers.get(HEADER_CONTENT_LENGTH) {
            let length = ContentLength::parse(value).ok_or_else(|| {
                SessionError::MalformedHeaders(format!("invalid Content-Length `{value}`"))
            })?;
            debug!("Reading fixed-length body of {} bytes", length.0);
            State::FixedBody {
                remaining: length.0,
            }
        } else if headers
            .get(HEADER_TRANSFER_ENCODING)
            .is_some_and(TransferEncoding::is_chunked)
        {
            debug!("Reading chunked body");
            State::ChunkSize
        } else {
            debug!("Reading body until close");
            State::UntilClose
        };
        Ok(None)
    }

    fn finalize(&mut self) -> Result<(), SessionError> {
        let raw = std::mem::take(&mut self.body).freeze();
        let encoding = self
            .response
            .headers()
            .get(HEADER_CONTENT_ENCODING)
            .map(str::to_string);
        let (body, compressed) = match encoding {
            Some(encoding) if !raw.is_empty() => decode::decode_body(&encoding, raw)?,
            _ => (raw, false),
        };
        debug!("Response body finalized, {} bytes", body.len());
        self.response.set_body(body, compressed);
        self.state = State::Done;
        Ok(())
    }

    /// Reads one more batch into the buffer. Returns 0 at end of stream.
    async fn fill<S>(&mut self, stream: &mut S) -> Result<usize, SessionError>
    where
        S: AsyncRead + Unpin + ?Sized,
    {
        if self.eof {
            return Ok(0);
        }
        self.buffer.reserve(READ_BUFFER_SIZE);
        match stream.read_buf(&mut self.buffer).await {
            Ok(0) => {
                self.eof = true;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                debug!("Peer closed without a clean shutdown, treating as end of stream");
                self.eof = true;
                Ok(0)
            }
            Err(e) => Err(SessionError::ReadError(e)),
        }
    }

    /// Reads one LF-terminated line (a trailing CR is dropped). `None` means
    /// the stream ended first; a partial line at end of stream is returned.
    async fn read_line<S>(
        &mut self,
        stream: &mut S,
        kind: LineKind,
        limit: usize,
    ) -> Result<Option<String>, SessionError>
    where
        S: AsyncRead + Unpin + ?Sized,
    {
        let mut scanned = 0;
        loop {
            if let Some(offset) = self.buffer[scanned..].iter().position(|&b| b == b'\n') {
                let end = scanned + offset;
                if end > limit {
                    return Err(kind.too_long(limit));
                }
                let mut line = self.buffer.split_to(end + 1);
                line.truncate(end);
                if line.last() == Some(&b'\r') {
                    line.truncate(end - 1);
                }
                return kind.decode(&line).map(Some);
            }
            scanned = self.buffer.len();
            if scanned > limit {
                return Err(kind.too_long(limit));
            }
            if self.fill(stream).await? == 0 {
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                let mut rest = self.buffer.split();
                if rest.last() == Some(&b'\r') {
                    rest.truncate(rest.len() - 1);
                }
                return kind.decode(&rest).map(Some);
            }
        }
    }
}
