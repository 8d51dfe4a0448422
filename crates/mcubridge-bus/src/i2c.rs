//! I2C slave device binding.
//!
//! Mirrors the SPI binding but for an I2C slave character device. The
//! host addresses the bridge as an I2C slave and reads back the staged
//! response buffer; addressing and clock stretching live in the kernel
//! driver, not here.

use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::error::{BusError, Result};

/// Open an I2C slave character device for blocking byte exchange.
pub(crate) fn open_device(path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|source| BusError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %path.display(), "opened I2C slave device");
    Ok(file)
}
