//! The digital GPIO peripheral handler.
//!
//! Frames addressed to [`mcubridge_frame::GPIO_REGISTER`] carry the
//! target in the payload itself: bits [1:3] select the pin, bits [4:7]
//! select the port. The command byte selects the operation and the
//! remaining payload bits carry its operand; the handler restages the
//! extracted operand as the response payload, so the host reads back
//! exactly the field the bridge acted on.

use std::collections::HashMap;

use mcubridge_frame::CommandFrame;
use mcubridge_port::{DriveMode, PortDriver, PortRegisters};

use crate::handler::Peripheral;

/// Drive the addressed pin with the payload's bit 0.
pub const CMD_WRITE_PIN: u8 = 0x01;

/// Apply the drive-mode encoding in payload bits [8:11] to the
/// addressed pin.
pub const CMD_SET_DRIVE_MODE: u8 = 0x03;

struct LogicalPort<R: PortRegisters> {
    name: String,
    driver: PortDriver<R>,
}

/// One configured logical port, as reported to diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSnapshot {
    pub name: String,
    pub port: u8,
    pub pin: u8,
    /// Right-justified electrical pin state.
    pub state: u8,
    /// Right-justified last-commanded output value.
    pub data: u8,
    pub interrupt_capable: bool,
}

/// GPIO handler: one [`PortDriver`] per configured logical port,
/// keyed by the protocol's (port index, pin index) pair.
pub struct GpioPorts<R: PortRegisters> {
    ports: HashMap<(u8, u8), LogicalPort<R>>,
}

impl<R: PortRegisters> GpioPorts<R> {
    /// Create an empty handler.
    pub fn new() -> Self {
        Self {
            ports: HashMap::new(),
        }
    }

    /// Add a logical port reachable at (port index, pin index).
    pub fn insert(&mut self, name: impl Into<String>, driver: PortDriver<R>) {
        let key = (driver.port(), driver.descriptor().shift());
        self.ports.insert(
            key,
            LogicalPort {
                name: name.into(),
                driver,
            },
        );
    }

    /// Number of configured logical ports.
    pub fn len(&self) -> usize {
        self.ports.len()
    }

    /// True when no logical ports are configured.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// Borrow the driver at a (port, pin) key.
    pub fn driver(&self, port: u8, pin: u8) -> Option<&PortDriver<R>> {
        self.ports.get(&(port, pin)).map(|entry| &entry.driver)
    }

    /// Snapshot every configured port for diagnostics, sorted by
    /// (port, pin). Reads both register views; no side effects.
    pub fn snapshot(&self) -> Vec<PortSnapshot> {
        let mut out: Vec<_> = self
            .ports
            .iter()
            .map(|(&(port, pin), entry)| PortSnapshot {
                name: entry.name.clone(),
                port,
                pin,
                state: entry.driver.read(),
                data: entry.driver.read_data_register(),
                interrupt_capable: entry.driver.interrupt_capable(),
            })
            .collect();
        out.sort_by_key(|snap| (snap.port, snap.pin));
        out
    }
}

impl<R: PortRegisters> Default for GpioPorts<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: PortRegisters + Send> Peripheral for GpioPorts<R> {
    fn name(&self) -> &'static str {
        "gpio"
    }

    fn handle(&mut self, frame: &mut CommandFrame) {
        let raw = frame.data;
        let key = (frame.port_index(), frame.pin_index());

        match frame.command {
            CMD_WRITE_PIN => {
                frame.data = raw & 0x0001;
                match self.ports.get(&key) {
                    Some(entry) => entry.driver.write(frame.data as u8),
                    None => tracing::debug!(
                        port = key.0,
                        pin = key.1,
                        "write to unconfigured logical port ignored"
                    ),
                }
            }
            CMD_SET_DRIVE_MODE => {
                frame.data = (raw >> 8) & 0x000F;
                let mode = DriveMode::from_wire(frame.data as u8);
                match (self.ports.get(&key), mode) {
                    (Some(entry), Some(mode)) => entry.driver.set_drive_mode(mode),
                    (None, _) => tracing::debug!(
                        port = key.0,
                        pin = key.1,
                        "drive mode for unconfigured logical port ignored"
                    ),
                    (_, None) => tracing::debug!(
                        encoding = frame.data,
                        "unassigned drive mode encoding ignored"
                    ),
                }
            }
            // Unsupported commands leave the frame untouched.
            _ => {}
        }
    }
}
