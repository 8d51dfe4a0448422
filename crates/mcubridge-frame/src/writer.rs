use std::io::{ErrorKind, Write};

use bytes::{BufMut, BytesMut};

use crate::codec::{encode_request, CommandFrame, FRAME_SIZE};
use crate::error::{FrameError, Result};

/// Writes complete 4-byte frames to any `Write` stream.
///
/// All four bytes of a response go out through the same path, least
/// significant byte first. A send never partially completes: short
/// writes are retried until the frame has fully left this layer.
pub struct ResponseWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> ResponseWriter<T> {
    /// Create a new response writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(FRAME_SIZE),
        }
    }

    /// Encode and send a 32-bit response value (blocking).
    pub fn send(&mut self, value: u32) -> Result<()> {
        self.buf.clear();
        self.buf.put_u32_le(value);
        self.write_buffered()
    }

    /// Send a request frame (the host side of the same wire).
    pub fn send_frame(&mut self, frame: &CommandFrame) -> Result<()> {
        self.buf.clear();
        self.buf.put_slice(&encode_request(frame));
        self.write_buffered()
    }

    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::LinkClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
