use std::io::{ErrorKind, Read, Write};

use crate::error::Result;
use crate::BusError;

/// A connected bus link — implements Read + Write.
///
/// This is the fundamental I/O type the frame layer runs on. Exactly one
/// binding is active per link, selected when the bridge is configured:
/// an SPI slave device, an I2C slave device, or a Unix stream loopback
/// standing in for a wired bus on hosted targets.
pub struct BusLink {
    inner: BusLinkInner,
}

enum BusLinkInner {
    #[cfg(unix)]
    Spi(std::fs::File),
    #[cfg(unix)]
    I2c(std::fs::File),
    #[cfg(unix)]
    Stream(std::os::unix::net::UnixStream),
}

impl BusLink {
    /// Open an SPI slave character device (e.g. `/dev/spidev0.0`).
    #[cfg(unix)]
    pub fn open_spi(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self {
            inner: BusLinkInner::Spi(crate::spi::open_device(path.as_ref())?),
        })
    }

    /// Open an I2C slave character device (e.g. `/dev/i2c-1`).
    #[cfg(unix)]
    pub fn open_i2c(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self {
            inner: BusLinkInner::I2c(crate::i2c::open_device(path.as_ref())?),
        })
    }

    /// Wrap an already-connected Unix stream as a loopback link.
    #[cfg(unix)]
    pub fn from_unix(stream: std::os::unix::net::UnixStream) -> Self {
        Self {
            inner: BusLinkInner::Stream(stream),
        }
    }

    /// Create a connected loopback pair.
    ///
    /// Bytes sent on one link are received on the other; used by tests
    /// and by host/bridge pairs running on the same machine.
    #[cfg(unix)]
    pub fn pair() -> Result<(Self, Self)> {
        let (a, b) = std::os::unix::net::UnixStream::pair()?;
        Ok((Self::from_unix(a), Self::from_unix(b)))
    }

    /// Receive a single byte, blocking until one is available.
    ///
    /// EOF surfaces as [`BusError::LinkClosed`], never as a zero byte.
    pub fn recv_byte(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        loop {
            match self.read(&mut byte) {
                Ok(0) => return Err(BusError::LinkClosed),
                Ok(_) => return Ok(byte[0]),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(BusError::Io(err)),
            }
        }
    }

    /// Send a single byte, blocking until the link accepts it.
    pub fn send_byte(&mut self, byte: u8) -> Result<()> {
        loop {
            match self.write(&[byte]) {
                Ok(0) => return Err(BusError::LinkClosed),
                Ok(_) => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(BusError::Io(err)),
            }
        }
        self.flush().map_err(BusError::Io)
    }

    /// Discard any bytes already pending on the receive side.
    ///
    /// Bus bindings buffer bytes independently of the bridge; this is
    /// the initialization hook that starts a session from a clean
    /// receive state. Bytes arriving after the drain are untouched.
    #[cfg(unix)]
    pub fn clear_buffers(&mut self) -> Result<()> {
        use std::os::fd::AsRawFd;

        let fd = match &self.inner {
            BusLinkInner::Spi(file) | BusLinkInner::I2c(file) => file.as_raw_fd(),
            BusLinkInner::Stream(stream) => stream.as_raw_fd(),
        };

        let drained = drain_fd(fd)?;
        if drained > 0 {
            tracing::debug!(drained, "discarded stale bytes from bus receive buffer");
        }
        Ok(())
    }

    /// Set read timeout on the underlying link.
    ///
    /// Only the loopback binding supports timeouts; device bindings
    /// block indefinitely by design.
    pub fn set_read_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        match &self.inner {
            #[cfg(unix)]
            BusLinkInner::Stream(stream) => stream.set_read_timeout(timeout).map_err(Into::into),
            #[cfg(unix)]
            _ => Err(BusError::Unsupported("read timeout")),
        }
    }

    /// Set write timeout on the underlying link.
    pub fn set_write_timeout(&self, timeout: Option<std::time::Duration>) -> Result<()> {
        match &self.inner {
            #[cfg(unix)]
            BusLinkInner::Stream(stream) => stream.set_write_timeout(timeout).map_err(Into::into),
            #[cfg(unix)]
            _ => Err(BusError::Unsupported("write timeout")),
        }
    }

    /// Try to clone this link (creates a new file descriptor).
    ///
    /// Used to split one link into a reader half and a writer half.
    pub fn try_clone(&self) -> Result<Self> {
        let inner = match &self.inner {
            #[cfg(unix)]
            BusLinkInner::Spi(file) => BusLinkInner::Spi(file.try_clone()?),
            #[cfg(unix)]
            BusLinkInner::I2c(file) => BusLinkInner::I2c(file.try_clone()?),
            #[cfg(unix)]
            BusLinkInner::Stream(stream) => BusLinkInner::Stream(stream.try_clone()?),
        };
        Ok(Self { inner })
    }
}

impl Read for BusLink {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            #[cfg(unix)]
            BusLinkInner::Spi(file) | BusLinkInner::I2c(file) => file.read(buf),
            #[cfg(unix)]
            BusLinkInner::Stream(stream) => stream.read(buf),
        }
    }
}

impl Write for BusLink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.inner {
            #[cfg(unix)]
            BusLinkInner::Spi(file) | BusLinkInner::I2c(file) => file.write(buf),
            #[cfg(unix)]
            BusLinkInner::Stream(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.inner {
            #[cfg(unix)]
            BusLinkInner::Spi(file) | BusLinkInner::I2c(file) => file.flush(),
            #[cfg(unix)]
            BusLinkInner::Stream(stream) => stream.flush(),
        }
    }
}

impl std::fmt::Debug for BusLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.inner {
            #[cfg(unix)]
            BusLinkInner::Spi(_) => "spi",
            #[cfg(unix)]
            BusLinkInner::I2c(_) => "i2c",
            #[cfg(unix)]
            BusLinkInner::Stream(_) => "loopback",
        };
        f.debug_struct("BusLink").field("binding", &kind).finish()
    }
}

/// Read and discard everything currently readable on `fd` without
/// blocking, then restore the descriptor's original flags.
#[cfg(unix)]
fn drain_fd(fd: std::os::fd::RawFd) -> Result<usize> {
    // SAFETY: fd is an open descriptor owned by this link; fcntl with
    // F_GETFL/F_SETFL and read into a valid local buffer are sound.
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL);
        if flags < 0 {
            return Err(BusError::Io(std::io::Error::last_os_error()));
        }
        if libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
            return Err(BusError::Io(std::io::Error::last_os_error()));
        }

        let mut scratch = [0u8; 256];
        let mut drained = 0usize;
        loop {
            let n = libc::read(fd, scratch.as_mut_ptr().cast(), scratch.len());
            if n > 0 {
                drained += n as usize;
                continue;
            }
            break;
        }

        if libc::fcntl(fd, libc::F_SETFL, flags) < 0 {
            return Err(BusError::Io(std::io::Error::last_os_error()));
        }
        Ok(drained)
    }
}
