//! Genre/role tags stored as a single byte bitmask.

use bitflags::bitflags;

bitflags! {
    /// A chart set's category tags.
    ///
    /// Only bits 2 (`INSTRUMENTAL`) and 3 (`VOCAL`) carry assigned meaning.
    /// `UNKNOWN_2` and `UNKNOWN_16` name two bits the wire format reserves
    /// without defining: keeping them as named constants, rather than bare
    /// magic numbers, documents that they're deliberately unassigned rather
    /// than forgotten. [`bitflags`]'s `from_bits_retain` keeps every other
    /// bit intact across a decode/encode round trip regardless.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Categories: u8 {
        const UNKNOWN_2    = 0b0000_0010;
        const INSTRUMENTAL = 0b0000_0100;
        const VOCAL        = 0b0000_1000;
        const UNKNOWN_16   = 0b0001_0000;
    }
}

impl Categories {
    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        Self::from_bits_retain(byte)
    }

    #[must_use]
    pub fn to_byte(self) -> u8 {
        self.bits()
    }
}
