use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::time::timeout;

use crate::buffer::ByteBuffer;
use crate::http::detector::{Detection, RequestDetector};
use crate::http::handler::{ConnectionOutcome, StaticFiles};
use crate::http::writer::ResponseWriter;

const READ_CHUNK: usize = 1024;

/// Transport limits applied while a request head is being read.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Give up on a request that has not completed after this many bytes
    pub max_request_bytes: usize,
    /// Maximum wait for each read
    pub read_timeout: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_request_bytes: 8192,
            read_timeout: Duration::from_secs(30),
        }
    }
}

pub struct Connection<S> {
    stream: S,
    peer: Option<SocketAddr>,
    buffer: ByteBuffer,
    detector: RequestDetector,
    files: Arc<StaticFiles>,
    limits: Limits,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Detection),
    Writing(ResponseWriter, Box<ConnectionOutcome>),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, files: Arc<StaticFiles>, limits: Limits) -> Self {
        Self {
            stream,
            peer: None,
            buffer: ByteBuffer::new(),
            detector: RequestDetector::new(),
            files,
            limits,
            state: ConnectionState::Reading,
        }
    }

    pub fn with_peer(mut self, peer: SocketAddr) -> Self {
        self.peer = Some(peer);
        self
    }

    /// Serves exactly one request, then closes.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        Some(detection) => ConnectionState::Processing(detection),
                        None => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(detection) => {
                    let detection = *detection;
                    let outcome = self.process(detection).await?;
                    let writer = ResponseWriter::new(outcome.response_bytes.clone());
                    self.state = ConnectionState::Writing(writer, Box::new(outcome));
                }

                ConnectionState::Writing(writer, outcome) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    log_access(self.peer, outcome);
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until the detector reaches a verdict.
    ///
    /// Returns `None` when the peer closed without sending anything or the
    /// read timed out. EOF after a partial head and an oversized head are
    /// reported as `Incomplete` so they get a 400.
    pub async fn read_request(&mut self) -> anyhow::Result<Option<Detection>> {
        loop {
            match self.detector.feed(self.buffer.as_bytes()) {
                Detection::Incomplete => {}
                done => return Ok(Some(done)),
            }

            if self.buffer.len() >= self.limits.max_request_bytes {
                tracing::warn!(
                    peer = ?self.peer,
                    received = self.buffer.len(),
                    "request head exceeds limit"
                );
                return Ok(Some(Detection::Incomplete));
            }

            let mut temp = [0u8; READ_CHUNK];
            let n = match timeout(self.limits.read_timeout, self.stream.read(&mut temp)).await {
                Ok(read) => read?,
                Err(_) => {
                    tracing::debug!(peer = ?self.peer, "read timed out");
                    return Ok(None);
                }
            };

            if n == 0 {
                // Client closed connection
                if self.buffer.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(Detection::Incomplete));
            }

            self.buffer.append(&temp[..n]);
        }
    }

    /// Runs the synchronous pipeline off the async worker threads.
    async fn process(&mut self, detection: Detection) -> anyhow::Result<ConnectionOutcome> {
        let files = Arc::clone(&self.files);
        let request_bytes = std::mem::take(&mut self.buffer).freeze();

        let outcome =
            tokio::task::spawn_blocking(move || files.respond(&request_bytes, detection)).await?;

        Ok(outcome)
    }
}

/// One access-log record per request.
fn log_access(peer: Option<SocketAddr>, outcome: &ConnectionOutcome) {
    let req = &outcome.request;
    let peer = peer
        .map(|p| p.ip().to_string())
        .unwrap_or_else(|| "-".to_string());
    let length = if outcome.content_length > -1 {
        outcome.content_length.to_string()
    } else {
        "-".to_string()
    };

    tracing::info!(
        target: "access",
        "{} - - \"{} {} {}\" {} {}",
        peer,
        String::from_utf8_lossy(&req.method_raw),
        String::from_utf8_lossy(&req.uri),
        String::from_utf8_lossy(&req.version_raw),
        outcome.status_code,
        length
    );
}
