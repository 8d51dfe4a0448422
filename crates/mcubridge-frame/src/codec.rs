//! Pure frame encode/decode.
//!
//! Request wire layout, byte by byte:
//! ```text
//! ┌──────────┬──────────┬──────────┬───────────┐
//! │ Address  │ Command  │ Data low │ Data high │
//! │ 1 byte   │ 1 byte   │ 1 byte   │ 1 byte    │
//! └──────────┴──────────┴──────────┴───────────┘
//! ```
//! Responses are one 32-bit value, least-significant byte first.
//!
//! Encode and decode are total functions: any 4 bytes decode to a
//! frame, any frame encodes to 4 bytes.

/// Wire size of a request or response, in bytes (fixed, exactly 4).
pub const FRAME_SIZE: usize = 4;

/// One decoded command frame.
///
/// Frames are ephemeral: created per transaction, consumed once by the
/// dispatch layer (which may restage `data` as the response payload),
/// then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandFrame {
    /// Target peripheral or logical pin group.
    pub address: u8,
    /// Peripheral-specific operation selector.
    pub command: u8,
    /// 16-bit payload, assembled low byte first.
    pub data: u16,
}

impl CommandFrame {
    /// Create a new frame.
    pub fn new(address: u8, command: u8, data: u16) -> Self {
        Self {
            address,
            command,
            data,
        }
    }

    /// Pin index carried in payload bits [1:3].
    pub fn pin_index(&self) -> u8 {
        ((self.data >> 1) & 0x0007) as u8
    }

    /// Port index carried in payload bits [4:7].
    pub fn port_index(&self) -> u8 {
        ((self.data >> 4) & 0x000F) as u8
    }
}

/// Encode a request frame to its 4 wire bytes.
pub fn encode_request(frame: &CommandFrame) -> [u8; FRAME_SIZE] {
    let [data_lo, data_hi] = frame.data.to_le_bytes();
    [frame.address, frame.command, data_lo, data_hi]
}

/// Decode 4 wire bytes into a request frame.
///
/// The payload is assembled as `(data_high << 8) | data_low` — bitwise
/// OR of non-overlapping shifted fields.
pub fn decode_request(bytes: [u8; FRAME_SIZE]) -> CommandFrame {
    let [address, command, data_lo, data_hi] = bytes;
    CommandFrame {
        address,
        command,
        data: (u16::from(data_hi) << 8) | u16::from(data_lo),
    }
}

/// Encode a 32-bit response value to its 4 wire bytes, LSB first.
pub fn encode_response(value: u32) -> [u8; FRAME_SIZE] {
    value.to_le_bytes()
}

/// Decode 4 response wire bytes back into a 32-bit value (host side).
pub fn decode_response(bytes: [u8; FRAME_SIZE]) -> u32 {
    u32::from_le_bytes(bytes)
}
