//! Board configuration.
//!
//! A board file declares the logical ports a bridge exposes: the
//! physical port register, the bit position and width of each, and
//! whether its physical port has an interrupt status register. The
//! config is plain JSON so hosts can version it next to their own
//! pin maps.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use mcubridge_frame::GPIO_REGISTER;
use mcubridge_port::{
    MemRegisters, PinId, PortConfig, PortDescriptor, PortDriver, PortError,
    PORT_COUNT, RESERVED_PORT, RESERVED_PORT_MASK,
};

use crate::error::{DispatchError, Result};
use crate::gpio::GpioPorts;
use crate::handler::DispatchTable;

/// One logical port declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortEntry {
    /// Unique name, used in diagnostics.
    pub name: String,
    /// Physical 8-bit port register.
    pub port: u8,
    /// Bit offset of the least-significant owned bit.
    pub pin: u8,
    /// Number of owned bits.
    #[serde(default = "default_width")]
    pub width: u8,
    /// Whether the physical port carries an interrupt status register.
    #[serde(default)]
    pub interrupt: bool,
}

fn default_width() -> u8 {
    1
}

/// The full set of logical ports for one bridge build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardConfig {
    pub ports: Vec<PortEntry>,
}

impl BoardConfig {
    /// Load a board config from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DispatchError::BoardRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a board config from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// The full pin grid: every single-bit pin on physical ports 0
    /// through 15, minus the two reserved bits of port 15.
    pub fn full_grid() -> Self {
        let mut ports = Vec::new();
        for port in 0..PORT_COUNT as u8 {
            for pin in 0..8u8 {
                if port == RESERVED_PORT && RESERVED_PORT_MASK & (1u8 << pin) != 0 {
                    continue;
                }
                ports.push(PortEntry {
                    name: format!("GPIO_{port}_{pin}"),
                    port,
                    pin,
                    width: 1,
                    interrupt: false,
                });
            }
        }
        Self { ports }
    }

    /// Reject configs a driver would refuse or that would let two
    /// logical ports fight over the same register bits.
    pub fn validate(&self) -> Result<()> {
        let mut names: HashSet<&str> = HashSet::new();
        let mut claimed: HashMap<u8, Vec<(PortDescriptor, &str)>> = HashMap::new();

        for entry in &self.ports {
            if !names.insert(entry.name.as_str()) {
                return Err(DispatchError::Board(format!(
                    "duplicate port name {:?}",
                    entry.name
                )));
            }

            if usize::from(entry.port) >= PORT_COUNT {
                return Err(DispatchError::Board(format!(
                    "port {:?}: physical port {} is out of range (0-{})",
                    entry.name,
                    entry.port,
                    PORT_COUNT - 1
                )));
            }

            let desc = PortDescriptor::new(entry.pin, entry.width)?;
            if entry.port == RESERVED_PORT && desc.mask() & RESERVED_PORT_MASK != 0 {
                return Err(DispatchError::Port(PortError::ReservedRegion {
                    port: entry.port,
                    mask: desc.mask(),
                }));
            }

            let siblings = claimed.entry(entry.port).or_default();
            for (other, other_name) in siblings.iter() {
                if desc.overlaps(other) {
                    tracing::debug!(
                        port = entry.port,
                        a = entry.name,
                        b = other_name,
                        "overlapping logical ports"
                    );
                    return Err(DispatchError::Port(PortError::Overlap {
                        port: entry.port,
                        mask: desc.mask(),
                    }));
                }
            }
            siblings.push((desc, entry.name.as_str()));
        }

        Ok(())
    }

    /// Build the register bank and GPIO handler this config describes.
    ///
    /// Interrupt status registers are armed before any driver is
    /// constructed, so the capability probe sees them.
    pub fn build_gpio(&self) -> Result<(Arc<Mutex<MemRegisters>>, GpioPorts<MemRegisters>)> {
        self.validate()?;

        let mut bank = MemRegisters::new();
        for entry in &self.ports {
            if entry.interrupt {
                bank = bank.with_interrupt_status(entry.port);
            }
        }
        let regs = Arc::new(Mutex::new(bank));

        let mut gpio = GpioPorts::new();
        for entry in &self.ports {
            let driver = PortDriver::new(
                Arc::clone(&regs),
                PortConfig {
                    port: entry.port,
                    shift: entry.pin,
                    width: entry.width,
                    pin: PinId::new(entry.port, entry.pin),
                },
            )?;
            gpio.insert(entry.name.clone(), driver);
        }

        tracing::debug!(ports = gpio.len(), "board gpio built");
        Ok((regs, gpio))
    }

    /// Build a complete dispatch table with the GPIO handler
    /// registered at its protocol address.
    pub fn build_table(&self) -> Result<(Arc<Mutex<MemRegisters>>, DispatchTable)> {
        let (regs, gpio) = self.build_gpio()?;
        let mut table = DispatchTable::new();
        table.register(GPIO_REGISTER, Box::new(gpio))?;
        Ok((regs, table))
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::full_grid()
    }
}
