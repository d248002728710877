use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::buffer::ByteBuffer;
use crate::http::response::Response;

/// Version token on every status line, whatever the request asked for.
const HTTP_VERSION: &str = "HTTP/1.0";

/// Frames `resp` for the wire.
///
/// Legacy responses are the bare body. Everything else gets a status line,
/// the headers in insertion order, a blank line and, unless the body is
/// omitted, the body.
pub fn serialize(resp: &Response) -> Bytes {
    if resp.legacy {
        return resp.body.clone();
    }

    let mut buf = ByteBuffer::with_capacity(128 + resp.sent_body().len());

    // Status line
    buf.append_str(HTTP_VERSION);
    buf.append_byte(b' ');
    buf.append_int(i64::from(resp.status.as_u16()));
    buf.append_byte(b' ');
    buf.append_str(resp.status.reason_phrase());
    buf.append(b"\r\n");

    // Headers
    for (k, v) in resp.headers.iter() {
        buf.append(k);
        buf.append(b": ");
        buf.append(v);
        buf.append(b"\r\n");
    }

    // Header/body separator
    buf.append(b"\r\n");

    buf.append(resp.sent_body());

    buf.freeze()
}

pub struct ResponseWriter {
    buffer: Bytes,
    written: usize,
}

impl ResponseWriter {
    pub fn new(bytes: Bytes) -> Self {
        Self {
            buffer: bytes,
            written: 0,
        }
    }

    pub async fn write_to_stream<S>(&mut self, stream: &mut S) -> anyhow::Result<()>
    where
        S: AsyncWrite + Unpin,
    {
        while self.written < self.buffer.len() {
            let n = stream.write(&self.buffer[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        stream.flush().await?;
        Ok(())
    }
}
