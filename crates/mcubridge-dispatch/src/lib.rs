//! Command routing for the peripheral bridge.
//!
//! A decoded frame is routed by its 8-bit address to exactly one
//! peripheral handler through a runtime-constructed dispatch table.
//! Addresses with no configured handler are silently ignored — the
//! host relies on "no response change" as the no-op signal — and the
//! dispatcher holds no state across frames.
//!
//! The [`Bridge`] ties it together: one blocking
//! decode → route → encode cycle per frame, no overlap between frames.

pub mod board;
pub mod bridge;
pub mod error;
pub mod gpio;
pub mod handler;

pub use board::{BoardConfig, PortEntry};
pub use bridge::Bridge;
pub use error::{DispatchError, Result};
pub use gpio::{GpioPorts, PortSnapshot, CMD_SET_DRIVE_MODE, CMD_WRITE_PIN};
pub use handler::{DispatchTable, Peripheral};
