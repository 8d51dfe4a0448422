//! Masked-register digital port abstraction.
//!
//! Several independently named logical ports share physical 8-bit
//! hardware registers. This crate keeps them from corrupting each
//! other: each logical port owns a contiguous run of bits described by
//! a mask/shift descriptor, every data write is a read-modify-write
//! through that descriptor, and bits outside the mask are preserved
//! bit for bit.
//!
//! Layers, bottom up:
//! - [`PortDescriptor`] — pure mask/shift arithmetic
//! - [`PortRegisters`] — the platform register backend trait
//! - [`PortDriver`] — per logical port read/write/drive-mode/interrupt

pub mod descriptor;
pub mod driver;
pub mod error;
pub mod mode;
pub mod regs;

pub use descriptor::PortDescriptor;
pub use driver::{PortConfig, PortDriver, RESERVED_PORT, RESERVED_PORT_MASK};
pub use error::{PortError, Result};
pub use mode::{DriveMode, PinId};
pub use regs::{MemRegisters, PortRegisters, PORT_COUNT};
