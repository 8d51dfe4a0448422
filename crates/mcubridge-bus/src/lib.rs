//! Physical bus bindings for the peripheral bridge.
//!
//! Provides a unified byte-at-a-time interface over the serial links a
//! host controller may be wired to:
//! - SPI slave character devices
//! - I2C slave character devices
//! - Unix stream loopback (tests and hosted deployments)
//!
//! This is the lowest layer of mcubridge. Everything else builds on top
//! of the [`BusLink`] type provided here.

pub mod error;
pub mod link;

#[cfg(unix)]
pub mod i2c;
#[cfg(unix)]
pub mod spi;

pub use error::{BusError, Result};
pub use link::BusLink;
