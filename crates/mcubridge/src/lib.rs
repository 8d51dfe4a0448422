//! Host-to-MCU peripheral command bridge.
//!
//! mcubridge turns a Raspberry-Pi-class host into the master of a
//! microcontroller's peripherals over SPI or I2C: fixed four-byte
//! command frames go down the wire, a dispatch table routes them to
//! peripheral handlers, and logical GPIO ports share physical
//! registers without corrupting each other.
//!
//! # Crate Structure
//!
//! - [`bus`] — SPI/I2C/loopback link bindings (byte transport)
//! - [`frame`] — 4-byte command frame codec, blocking reader/writer
//! - [`port`] — masked-register digital port abstraction
//! - [`dispatch`] — address routing, GPIO handler, the bridge loop
//!   (behind the `dispatch` feature)

/// Re-export bus link types.
pub mod bus {
    pub use mcubridge_bus::*;
}

/// Re-export frame types.
pub mod frame {
    pub use mcubridge_frame::*;
}

/// Re-export port types.
pub mod port {
    pub use mcubridge_port::*;
}

/// Re-export dispatch types (requires `dispatch` feature).
#[cfg(feature = "dispatch")]
pub mod dispatch {
    pub use mcubridge_dispatch::*;
}
