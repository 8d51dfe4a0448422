//! SPI slave device binding.
//!
//! The bridge side of the link is an SPI slave: the host master clocks
//! bytes in and out, and the kernel driver exposes the exchange as a
//! character device. The binding treats the device as a plain blocking
//! byte stream; clock rate, mode and FIFO depth are the driver's
//! concern, configured outside this crate.

use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::error::{BusError, Result};

/// Open an SPI slave character device for blocking byte exchange.
pub(crate) fn open_device(path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|source| BusError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %path.display(), "opened SPI slave device");
    Ok(file)
}
