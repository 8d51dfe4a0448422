//! Fixed-size command framing for the peripheral bridge.
//!
//! Every exchange on the bus is one 4-byte request and one 4-byte
//! response — no delimiters, no checksum, no sessions:
//! - Request: `[address][command][data_low][data_high]`
//! - Response: a 32-bit value, least-significant byte first
//!
//! No partial frames ever cross this layer: the reader blocks until all
//! four bytes have arrived, the writer pushes all four bytes out.

pub mod address;
pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use address::{address_name, is_reserved, CHECK_BUILD, GPIO_REGISTER, RESET_ADDRESS};
pub use codec::{
    decode_request, decode_response, encode_request, encode_response, CommandFrame, FRAME_SIZE,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::ResponseWriter;
