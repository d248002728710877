//! Growable byte buffer
//!
//! Thin wrapper around [`BytesMut`] used for inbound request bytes and for
//! assembling outbound responses.

use bytes::{BufMut, Bytes, BytesMut};

/// Default capacity for a fresh connection buffer
pub const DEFAULT_CAPACITY: usize = 4096;

#[derive(Debug, Default, Clone)]
pub struct ByteBuffer {
    inner: BytesMut,
}

impl ByteBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: BytesMut::with_capacity(capacity),
        }
    }

    /// Appends raw bytes at the end of the buffer.
    pub fn append(&mut self, data: &[u8]) {
        self.inner.extend_from_slice(data);
    }

    pub fn append_str(&mut self, s: &str) {
        self.append(s.as_bytes());
    }

    /// Appends the decimal rendering of `value`.
    pub fn append_int(&mut self, value: i64) {
        self.append_str(&value.to_string());
    }

    pub fn append_byte(&mut self, b: u8) {
        self.inner.put_u8(b);
    }

    /// Empties the buffer, keeping its allocation.
    ///
    /// Any slice previously borrowed through [`ByteBuffer::as_bytes`] must be
    /// dropped before this is called; the borrow checker enforces it.
    pub fn reset(&mut self) {
        self.inner.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    /// Converts the buffer into an immutable, cheaply clonable [`Bytes`].
    pub fn freeze(self) -> Bytes {
        self.inner.freeze()
    }
}
