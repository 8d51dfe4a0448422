//! Per logical port driver.
//!
//! A [`PortDriver`] exposes one named logical port — a 1+ bit slice of
//! a shared physical register — with write/read/drive-mode/interrupt
//! operations. Sibling ports on the same register each hold their own
//! driver; the shared backend sits behind one mutex, so every
//! read-modify-write sequence runs as a unit and siblings can never
//! interleave inside one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::descriptor::PortDescriptor;
use crate::error::{PortError, Result};
use crate::mode::{DriveMode, PinId};
use crate::regs::PortRegisters;

/// Physical port whose top bits are never exposed for bit-level access.
pub const RESERVED_PORT: u8 = 15;

/// The reserved bits of [`RESERVED_PORT`]: bits 7:6.
pub const RESERVED_PORT_MASK: u8 = 0xC0;

/// Configuration for one logical port, fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortConfig {
    /// Physical port register this logical port lives in.
    pub port: u8,
    /// Bit offset of the least-significant owned bit.
    pub shift: u8,
    /// Number of owned bits.
    pub width: u8,
    /// Pin identity used for per-pin drive-mode configuration.
    pub pin: PinId,
}

/// Driver for one logical port over a shared register backend.
pub struct PortDriver<R: PortRegisters> {
    regs: Arc<Mutex<R>>,
    port: u8,
    desc: PortDescriptor,
    pin: PinId,
    interrupt_capable: bool,
}

impl<R: PortRegisters> PortDriver<R> {
    /// Materialize a driver for `config`.
    ///
    /// Refuses to build a driver whose bits collide with the reserved
    /// region (bits 7:6 of physical port 15) — a silently
    /// non-functional driver is worse than none. The interrupt
    /// capability is probed here, once, and never at call time.
    pub fn new(regs: Arc<Mutex<R>>, config: PortConfig) -> Result<Self> {
        let desc = PortDescriptor::new(config.shift, config.width)?;

        if config.port == RESERVED_PORT && desc.mask() & RESERVED_PORT_MASK != 0 {
            return Err(PortError::ReservedRegion {
                port: config.port,
                mask: desc.mask(),
            });
        }

        let interrupt_capable = lock(&regs).has_interrupt_status(config.port);

        Ok(Self {
            regs,
            port: config.port,
            desc,
            pin: config.pin,
            interrupt_capable,
        })
    }

    /// Write a right-justified value to this port's bits.
    ///
    /// Read-modify-write against the Data register; bits owned by
    /// sibling ports are untouched.
    pub fn write(&self, value: u8) {
        let mut regs = lock(&self.regs);
        let current = regs.read_data(self.port);
        regs.write_data(self.port, self.desc.pack(current, value));
    }

    /// Read the electrical pin state, right justified.
    pub fn read(&self) -> u8 {
        self.desc.unpack(lock(&self.regs).read_pin_state(self.port))
    }

    /// Read the last commanded output value from the Data register.
    ///
    /// Differs from [`read`](Self::read) for open-drain or externally
    /// driven pins.
    pub fn read_data_register(&self) -> u8 {
        self.desc.unpack(lock(&self.regs).read_data(self.port))
    }

    /// Apply an electrical drive mode via the platform's per-pin
    /// configuration primitive.
    pub fn set_drive_mode(&self, mode: DriveMode) {
        tracing::trace!(pin = %self.pin, ?mode, "set drive mode");
        lock(&self.regs).set_drive_mode(self.pin, mode);
    }

    /// Whether this port has an interrupt status register. Check once
    /// at configuration time; the answer never changes afterwards.
    pub fn interrupt_capable(&self) -> bool {
        self.interrupt_capable
    }

    /// Read and clear this port's pending interrupt bits, returning
    /// the right-justified value captured before the clear. `None`
    /// exactly when [`interrupt_capable`](Self::interrupt_capable) is
    /// false.
    pub fn clear_interrupt(&self) -> Option<u8> {
        if !self.interrupt_capable {
            return None;
        }
        lock(&self.regs)
            .read_clear_interrupt(self.port, self.desc.mask())
            .map(|raw| raw >> self.desc.shift())
    }

    /// Physical port number.
    pub fn port(&self) -> u8 {
        self.port
    }

    /// Bit position metadata.
    pub fn descriptor(&self) -> PortDescriptor {
        self.desc
    }

    /// Pin identity used for drive-mode configuration.
    pub fn pin(&self) -> PinId {
        self.pin
    }
}

// A poisoned backend mutex only means another driver panicked mid-call;
// the register bank itself stays usable.
fn lock<R>(regs: &Arc<Mutex<R>>) -> MutexGuard<'_, R> {
    regs.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::MemRegisters;

    fn bank() -> Arc<Mutex<MemRegisters>> {
        Arc::new(Mutex::new(MemRegisters::new()))
    }

    fn single_bit(regs: &Arc<Mutex<MemRegisters>>, port: u8, bit: u8) -> PortDriver<MemRegisters> {
        PortDriver::new(
            Arc::clone(regs),
            PortConfig {
                port,
                shift: bit,
                width: 1,
                pin: PinId::new(port, bit),
            },
        )
        .unwrap()
    }

    #[test]
    fn siblings_do_not_disturb_each_other() {
        let regs = bank();
        let a = single_bit(&regs, 0, 0); // mask 0b01
        let b = single_bit(&regs, 0, 1); // mask 0b10

        a.write(1);
        assert_eq!(regs.lock().unwrap().read_data(0), 0b0000_0001);

        b.write(1);
        assert_eq!(regs.lock().unwrap().read_data(0), 0b0000_0011);
        assert_eq!(a.read_data_register(), 1);

        a.write(0);
        assert_eq!(regs.lock().unwrap().read_data(0), 0b0000_0010);
        assert_eq!(b.read_data_register(), 1);
    }

    #[test]
    fn reads_are_idempotent() {
        let regs = bank();
        let driver = single_bit(&regs, 4, 3);
        driver.write(1);

        assert_eq!(driver.read(), driver.read());
        assert_eq!(driver.read_data_register(), driver.read_data_register());
    }

    #[test]
    fn read_uses_pin_state_not_data_register() {
        let regs = bank();
        let driver = single_bit(&regs, 2, 0);

        driver.write(1);
        regs.lock().unwrap().force_pin_state(2, 0); // externally pulled low

        assert_eq!(driver.read_data_register(), 1);
        assert_eq!(driver.read(), 0);
    }

    #[test]
    fn multi_bit_port_packs_right_justified() {
        let regs = bank();
        let driver = PortDriver::new(
            Arc::clone(&regs),
            PortConfig {
                port: 6,
                shift: 2,
                width: 3,
                pin: PinId::new(6, 2),
            },
        )
        .unwrap();

        driver.write(0b101);
        assert_eq!(regs.lock().unwrap().read_data(6), 0b0001_0100);
        assert_eq!(driver.read_data_register(), 0b101);
    }

    #[test]
    fn reserved_region_refuses_to_materialize() {
        let regs = bank();
        let err = PortDriver::new(
            Arc::clone(&regs),
            PortConfig {
                port: RESERVED_PORT,
                shift: 6,
                width: 1,
                pin: PinId::new(RESERVED_PORT, 6),
            },
        )
        .err()
        .unwrap();

        assert_eq!(
            err,
            PortError::ReservedRegion {
                port: RESERVED_PORT,
                mask: 0b0100_0000,
            }
        );

        // The low bits of the same physical port stay available.
        assert!(single_bit(&regs, RESERVED_PORT, 0).read() == 0);
    }

    #[test]
    fn drive_mode_goes_through_the_pin_primitive() {
        let regs = bank();
        let driver = single_bit(&regs, 1, 5);

        driver.set_drive_mode(DriveMode::OdDrivesLow);

        assert_eq!(
            regs.lock().unwrap().drive_mode(PinId::new(1, 5)),
            Some(DriveMode::OdDrivesLow)
        );
        // Data register untouched by drive-mode configuration.
        assert_eq!(regs.lock().unwrap().read_data(1), 0);
    }

    #[test]
    fn interrupt_capability_probed_at_construction() {
        let regs = Arc::new(Mutex::new(MemRegisters::new().with_interrupt_status(3)));

        let with_irq = single_bit(&regs, 3, 1);
        let without_irq = single_bit(&regs, 4, 1);

        assert!(with_irq.interrupt_capable());
        assert!(!without_irq.interrupt_capable());
        assert_eq!(without_irq.clear_interrupt(), None);
    }

    #[test]
    fn clear_interrupt_returns_pending_then_clears() {
        let regs = Arc::new(Mutex::new(MemRegisters::new().with_interrupt_status(3)));
        let a = single_bit(&regs, 3, 1);
        let b = single_bit(&regs, 3, 2);

        regs.lock().unwrap().raise_interrupt(3, 0b0000_0110);

        assert_eq!(a.clear_interrupt(), Some(1));
        assert_eq!(a.clear_interrupt(), Some(0));
        // Sibling's pending bit survived A's clear.
        assert_eq!(b.clear_interrupt(), Some(1));
    }
}
