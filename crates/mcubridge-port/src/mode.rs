//! Pin identity and electrical drive modes.

/// Addresses one physical pin for the platform pin-configuration
/// primitive. Drive-mode configuration uses a different register set
/// than data I/O, so pins are addressed directly rather than through
/// the shared data register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinId {
    /// Physical port number.
    pub port: u8,
    /// Bit position within the port, 0-7.
    pub pin: u8,
}

impl PinId {
    /// Create a pin identifier.
    pub fn new(port: u8, pin: u8) -> Self {
        Self { port, pin }
    }
}

impl std::fmt::Display for PinId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "P{}[{}]", self.port, self.pin)
    }
}

/// Electrical configuration of a pin, independent of its data value.
///
/// This is a closed set: the hardware supports exactly these eight
/// modes. The discriminants are the 4-bit wire encodings the host uses
/// when it sets a drive mode over the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DriveMode {
    /// High-impedance analog.
    AlgHiZ = 0x0,
    /// High-impedance digital.
    DigHiZ = 0x2,
    /// Resistive pull-up.
    ResPullUp = 0x4,
    /// Resistive pull-down.
    ResPullDown = 0x6,
    /// Open drain, drives low.
    OdDrivesLow = 0x8,
    /// Open drain, drives high.
    OdDrivesHigh = 0xA,
    /// Strong drive.
    Strong = 0xC,
    /// Resistive pull-up and pull-down.
    ResPullUpDown = 0xE,
}

impl DriveMode {
    /// Decode a 4-bit wire encoding. Odd values and anything above
    /// 0xE are unassigned and return `None`.
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0x0 => Some(Self::AlgHiZ),
            0x2 => Some(Self::DigHiZ),
            0x4 => Some(Self::ResPullUp),
            0x6 => Some(Self::ResPullDown),
            0x8 => Some(Self::OdDrivesLow),
            0xA => Some(Self::OdDrivesHigh),
            0xC => Some(Self::Strong),
            0xE => Some(Self::ResPullUpDown),
            _ => None,
        }
    }

    /// The 4-bit wire encoding for this mode.
    pub fn to_wire(self) -> u8 {
        self as u8
    }
}
