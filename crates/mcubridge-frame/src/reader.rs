use std::io::{ErrorKind, Read};

use mcubridge_bus::BusLink;

use crate::codec::{decode_request, CommandFrame, FRAME_SIZE};
use crate::error::{FrameError, Result};

/// Reads complete command frames from any `Read` stream.
///
/// The read blocks until all four bytes of a frame have arrived, in
/// order address, command, data-low, data-high. Callers never see a
/// partial frame: if the link stalls mid-frame the call stays blocked,
/// and if the link closes mid-frame the frame is discarded.
pub struct FrameReader<T> {
    inner: T,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Err(FrameError::LinkClosed)` when EOF is reached.
    pub fn read_frame(&mut self) -> Result<CommandFrame> {
        let mut bytes = [0u8; FRAME_SIZE];
        let mut filled = 0usize;

        while filled < FRAME_SIZE {
            let read = match self.inner.read(&mut bytes[filled..]) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::LinkClosed);
            }

            filled += read;
        }

        Ok(decode_request(bytes))
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl FrameReader<BusLink> {
    /// Create a frame reader over a bus link, draining any stale bytes
    /// already buffered on the link first.
    #[cfg(unix)]
    pub fn over_link(mut link: BusLink) -> Result<Self> {
        link.clear_buffers().map_err(bus_to_frame_error)?;
        Ok(Self::new(link))
    }
}

#[cfg(unix)]
fn bus_to_frame_error(err: mcubridge_bus::BusError) -> FrameError {
    match err {
        mcubridge_bus::BusError::Io(io) => FrameError::Io(io),
        mcubridge_bus::BusError::Open { source, .. } => FrameError::Io(source),
        mcubridge_bus::BusError::LinkClosed => FrameError::LinkClosed,
        other => FrameError::Io(std::io::Error::other(other.to_string())),
    }
}
