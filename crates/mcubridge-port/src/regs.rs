//! Register backends.
//!
//! A register bank is the single point of truth for its physical
//! registers. Logical ports never hold register values of their own;
//! they go through one of these backends for every access, which is
//! what makes the read-modify-write discipline enforceable.

use crate::mode::{DriveMode, PinId};

/// Platform register interface for the digital port banks.
///
/// Implementations map these operations onto the target's actual
/// register file. Port numbers index physical 8-bit registers; masks
/// are ownership masks from a [`crate::PortDescriptor`].
pub trait PortRegisters {
    /// Current value of the Data (output) register for a port.
    fn read_data(&self, port: u8) -> u8;

    /// Replace the Data register value for a port.
    ///
    /// Callers must only ever write values derived from `read_data`
    /// via a descriptor's `pack` — never a raw overwrite.
    fn write_data(&mut self, port: u8, value: u8);

    /// Current value of the Pin-State (input) register for a port.
    /// Reflects the electrical state, which differs from the Data
    /// register for open-drain or externally driven pins.
    fn read_pin_state(&self, port: u8) -> u8;

    /// Whether the platform has an interrupt status register for this
    /// port. Resolved once at configuration time.
    fn has_interrupt_status(&self, port: u8) -> bool;

    /// Read and clear the interrupt status bits selected by `mask`,
    /// returning the raw (unshifted) masked status captured before
    /// clearing. `None` when the port has no interrupt register.
    fn read_clear_interrupt(&mut self, port: u8, mask: u8) -> Option<u8>;

    /// Apply an electrical drive mode to a single pin. Uses the
    /// platform's per-pin configuration registers, not the shared
    /// data register.
    fn set_drive_mode(&mut self, pin: PinId, mode: DriveMode);
}

/// Number of physical 8-bit port registers in a bank. Port numbers on
/// the wire and in board configs must stay below this.
pub const PORT_COUNT: usize = 16;

/// In-memory register bank.
///
/// Backs tests, the loopback bridge and the CLI. Pin state mirrors the
/// data register unless a port is forced to a fixed input value, which
/// models externally driven pins.
#[derive(Debug)]
pub struct MemRegisters {
    data: [u8; PORT_COUNT],
    pin_state: [Option<u8>; PORT_COUNT],
    interrupt: [Option<u8>; PORT_COUNT],
    drive_modes: [[Option<DriveMode>; 8]; PORT_COUNT],
}

impl MemRegisters {
    /// Create a bank with all registers zeroed and no interrupt
    /// status registers.
    pub fn new() -> Self {
        Self {
            data: [0; PORT_COUNT],
            pin_state: [None; PORT_COUNT],
            interrupt: [None; PORT_COUNT],
            drive_modes: [[None; 8]; PORT_COUNT],
        }
    }

    /// Give a port an interrupt status register, initially clear.
    pub fn with_interrupt_status(mut self, port: u8) -> Self {
        self.interrupt[usize::from(port)] = Some(0);
        self
    }

    /// Force a port's pin-state register to a fixed value, decoupling
    /// it from the data register.
    pub fn force_pin_state(&mut self, port: u8, value: u8) {
        self.pin_state[usize::from(port)] = Some(value);
    }

    /// Let a port's pin state mirror its data register again.
    pub fn release_pin_state(&mut self, port: u8) {
        self.pin_state[usize::from(port)] = None;
    }

    /// Latch pending interrupt bits for a port. No effect on ports
    /// without an interrupt status register.
    pub fn raise_interrupt(&mut self, port: u8, bits: u8) {
        if let Some(status) = self.interrupt[usize::from(port)].as_mut() {
            *status |= bits;
        }
    }

    /// Drive mode last applied to a pin, if any.
    pub fn drive_mode(&self, pin: PinId) -> Option<DriveMode> {
        self.drive_modes[usize::from(pin.port)][usize::from(pin.pin)]
    }
}

impl Default for MemRegisters {
    fn default() -> Self {
        Self::new()
    }
}

impl PortRegisters for MemRegisters {
    fn read_data(&self, port: u8) -> u8 {
        self.data[usize::from(port)]
    }

    fn write_data(&mut self, port: u8, value: u8) {
        self.data[usize::from(port)] = value;
    }

    fn read_pin_state(&self, port: u8) -> u8 {
        self.pin_state[usize::from(port)].unwrap_or(self.data[usize::from(port)])
    }

    fn has_interrupt_status(&self, port: u8) -> bool {
        self.interrupt[usize::from(port)].is_some()
    }

    fn read_clear_interrupt(&mut self, port: u8, mask: u8) -> Option<u8> {
        let status = self.interrupt[usize::from(port)].as_mut()?;
        let pending = *status & mask;
        *status &= !mask;
        Some(pending)
    }

    fn set_drive_mode(&mut self, pin: PinId, mode: DriveMode) {
        self.drive_modes[usize::from(pin.port)][usize::from(pin.pin)] = Some(mode);
    }
}
