//! Mask/shift arithmetic for one logical port.
//!
//! A descriptor translates between a logical port's right-justified
//! value and its position inside a shared physical register. `pack` and
//! `unpack` are pure, total functions; for any register value `r` and
//! any `v`, `unpack(pack(r, v)) == v & ((1 << width) - 1)`.

use crate::error::{PortError, Result};

/// Compile-time-fixed bit position metadata for one logical port.
///
/// The mask is always a contiguous run of `width` ones starting at bit
/// `shift`; both constructors enforce this, so a constructed descriptor
/// never violates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortDescriptor {
    mask: u8,
    shift: u8,
    width: u8,
}

impl PortDescriptor {
    /// Build a descriptor from a bit offset and field width.
    pub fn new(shift: u8, width: u8) -> Result<Self> {
        if width == 0 || width > 8 || shift > 7 || shift + width > 8 {
            return Err(PortError::InvalidField { shift, width });
        }
        let mask = (((1u16 << width) - 1) as u8) << shift;
        Ok(Self { mask, shift, width })
    }

    /// Build a descriptor from an ownership mask.
    pub fn from_mask(mask: u8) -> Result<Self> {
        if mask == 0 {
            return Err(PortError::NonContiguousMask(mask));
        }
        let shift = mask.trailing_zeros() as u8;
        let body = mask >> shift;
        // A contiguous run right-justifies to all ones.
        if body & (body.wrapping_add(1)) != 0 {
            return Err(PortError::NonContiguousMask(mask));
        }
        Ok(Self {
            mask,
            shift,
            width: body.count_ones() as u8,
        })
    }

    /// The 1-bits this logical port owns within its register.
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Bit offset of the least-significant owned bit.
    pub fn shift(&self) -> u8 {
        self.shift
    }

    /// Number of owned bits.
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Merge a right-justified logical value into a register value.
    ///
    /// `value` need not be pre-masked; only the shifted, masked result
    /// is applied. Bits outside the mask come back bit for bit from
    /// `register`.
    pub fn pack(&self, register: u8, value: u8) -> u8 {
        (register & !self.mask) | ((value << self.shift) & self.mask)
    }

    /// Extract this port's right-justified value from a register value.
    pub fn unpack(&self, register: u8) -> u8 {
        (register & self.mask) >> self.shift
    }

    /// True if the two descriptors claim any of the same bits.
    pub fn overlaps(&self, other: &PortDescriptor) -> bool {
        self.mask & other.mask != 0
    }
}
