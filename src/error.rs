//! Unified error type for capmem.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` (with the `defmt` feature) for on-target logging.

/// Top-level error type used across the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Storage
    /// Flash read/write/erase failed.
    Flash,

    /// The flash region cannot hold the cell ring (alignment, size or page count).
    Layout,

    /// A cell index past the end of the ring was addressed.
    CellOutOfRange,

    /// Only encoded mode bytes (`0..=0x7F`) may be persisted.
    InvalidValue,
}
