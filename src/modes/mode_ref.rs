//! Encoded mode reference, as persisted in the mode store.
//!
//! Layout (1 byte):
//! ```text
//! Bit 7:    always 0 (0xFF is reserved as the erased sentinel)
//! Bit 6:    extended flag
//! Bit 0-5:  direct form   - zero-based primary table index
//!           extended form - one-based extended table index
//! ```

const EXTENDED_FLAG: u8 = 0x40;
const INDEX_MASK: u8 = 0x3F;
const RESERVED_BIT: u8 = 0x80;

/// Reference into one of the two mode tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeRef {
    /// Zero-based index into the primary table.
    Primary(u8),
    /// One-based index into the extended table.
    Extended(u8),
}

impl ModeRef {
    /// Encode for storage. Indices are truncated to 6 bits.
    pub const fn to_byte(self) -> u8 {
        match self {
            ModeRef::Primary(index) => index & INDEX_MASK,
            ModeRef::Extended(index) => EXTENDED_FLAG | (index & INDEX_MASK),
        }
    }

    /// Decode a stored byte. Bytes with bit 7 set (including the erased
    /// sentinel) are not mode references.
    pub const fn from_byte(byte: u8) -> Option<Self> {
        if byte & RESERVED_BIT != 0 {
            return None;
        }
        let index = byte & INDEX_MASK;
        if byte & EXTENDED_FLAG != 0 {
            Some(ModeRef::Extended(index))
        } else {
            Some(ModeRef::Primary(index))
        }
    }

    pub const fn is_extended(self) -> bool {
        matches!(self, ModeRef::Extended(_))
    }
}

impl Default for ModeRef {
    fn default() -> Self {
        ModeRef::Primary(0)
    }
}
