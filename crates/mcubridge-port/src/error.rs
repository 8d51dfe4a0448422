/// Errors that can occur when describing or materializing a port.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PortError {
    /// Shift/width do not describe a bit field inside one 8-bit register.
    #[error("invalid bit field (shift {shift}, width {width})")]
    InvalidField { shift: u8, width: u8 },

    /// The mask is not one contiguous run of ones.
    #[error("mask {0:#04x} is not a contiguous run of bits")]
    NonContiguousMask(u8),

    /// The descriptor collides with a physical region that is never
    /// exposed for bit-level access.
    #[error("port {port} mask {mask:#04x} overlaps a reserved register region")]
    ReservedRegion { port: u8, mask: u8 },

    /// Two logical ports on the same physical register claim the same bits.
    #[error("port {port} mask {mask:#04x} overlaps an already-configured logical port")]
    Overlap { port: u8, mask: u8 },
}

pub type Result<T> = std::result::Result<T, PortError>;
