//! Persistent storage for the encoded mode byte.
//!
//! The byte lives in a ring of [`STORE_CELLS`] one-byte cells so that
//! every save lands on a different cell and wear is spread evenly.
//!
//! Storage layout:
//!   - Exactly one cell holds the current byte; all others hold [`ERASED`].
//!   - A save writes the next cell first and only then erases the old one,
//!     so losing power half-way leaves two valid neighbours rather than none.
//!   - `load` treats the later of two neighbours as current and erases the
//!     stale one.

pub mod flash;

pub use flash::FlashCells;

use crate::config::{ERASED, MAX_ENCODED, STORE_CELLS};
use crate::error::Error;
#[cfg(feature = "defmt")]
use defmt::{debug, warn};

/// A fixed ring of byte cells on some non-volatile medium.
pub trait Cells {
    /// Read a cell. Erased cells read as [`ERASED`].
    fn read(&mut self, cell: usize) -> Result<u8, Error>;

    /// Store `value` in an erased cell.
    fn write(&mut self, cell: usize, value: u8) -> Result<(), Error>;

    /// Return a cell to [`ERASED`].
    fn erase(&mut self, cell: usize) -> Result<(), Error>;
}

impl<T: Cells> Cells for &mut T {
    fn read(&mut self, cell: usize) -> Result<u8, Error> {
        (**self).read(cell)
    }

    fn write(&mut self, cell: usize, value: u8) -> Result<(), Error> {
        (**self).write(cell, value)
    }

    fn erase(&mut self, cell: usize) -> Result<(), Error> {
        (**self).erase(cell)
    }
}

/// Wear-levelled single-value log over a [`Cells`] ring.
pub struct ModeStore<C> {
    cells: C,
    /// Cell holding the current value.
    cursor: usize,
}

impl<C: Cells> ModeStore<C> {
    /// Wrap a medium. Call [`load`](Self::load) before saving.
    pub const fn new(cells: C) -> Self {
        Self { cells, cursor: 0 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn into_inner(self) -> C {
        self.cells
    }

    /// Find the current byte and remember its cell.
    ///
    /// An all-erased ring yields `0` with the cursor on cell 0.
    pub fn load(&mut self) -> Result<u8, Error> {
        let mut found = None;
        for cell in 0..STORE_CELLS {
            let value = self.cells.read(cell)?;
            if value != ERASED {
                found = Some((cell, value));
                break;
            }
        }

        let Some((first, first_value)) = found else {
            #[cfg(feature = "defmt")]
            debug!("ModeStore: empty");
            self.cursor = 0;
            return Ok(0);
        };

        // Saves write at cursor + 1, so of two live neighbours the later one
        // is newer. Cell 0 is the later neighbour of the last cell.
        let next = (first + 1) % STORE_CELLS;
        let last = STORE_CELLS - 1;
        let next_value = self.cells.read(next)?;
        let (current, value, stale) = if next_value != ERASED {
            (next, next_value, Some(first))
        } else if first == 0 && self.cells.read(last)? != ERASED {
            (first, first_value, Some(last))
        } else {
            (first, first_value, None)
        };

        if let Some(stale) = stale {
            #[cfg(feature = "defmt")]
            warn!("ModeStore: interrupted save, dropping cell {}", stale);
            // The newer value is already in hand; a failed repair only leaves
            // the stale cell for the next load to retry.
            if let Err(_e) = self.cells.erase(stale) {
                #[cfg(feature = "defmt")]
                warn!("ModeStore: repair of cell {} failed: {:?}", stale, _e);
            }
        }

        self.cursor = current;
        #[cfg(feature = "defmt")]
        debug!("ModeStore: loaded {=u8:#x} from cell {}", value, current);
        Ok(value)
    }

    /// Write `value` to the next cell, then erase the previous one.
    pub fn save(&mut self, value: u8) -> Result<(), Error> {
        if value > MAX_ENCODED {
            return Err(Error::InvalidValue);
        }

        let previous = self.cursor;
        let next = (previous + 1) % STORE_CELLS;

        self.cells.write(next, value)?;
        self.cursor = next;
        self.cells.erase(previous)?;

        #[cfg(feature = "defmt")]
        debug!("ModeStore: saved {=u8:#x} to cell {}", value, next);
        Ok(())
    }
}
