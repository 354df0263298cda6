//! Cell ring on NOR flash.
//!
//! NOR flash can only clear bits, and only whole pages can be erased, so a
//! cell cannot be returned to `0xFF` on its own. Each cell therefore spans
//! two write units:
//!
//! ```text
//! unit 0: value  [v, FF, ..]   blank (all FF) = never written
//! unit 1: retire [00, 00, ..]  blank = live, programmed = erased
//! ```
//!
//! The ring is split over at least two pages. Writing the first cell of a
//! page erases that page first; the live cell is then always the last cell
//! of the previous page, so write-before-erase still holds.

use embedded_storage::nor_flash::{NorFlash, ReadNorFlash};

use crate::config::{ERASED, STORE_CELLS};
use crate::error::Error;
#[cfg(feature = "defmt")]
use defmt::trace;

use super::Cells;

/// Largest flash write unit supported.
const MAX_WRITE_SIZE: usize = 8;

/// [`Cells`] backed by a region of NOR flash.
pub struct FlashCells<F> {
    flash: F,
    base: u32,
    cells_per_page: usize,
}

impl<F: NorFlash> FlashCells<F> {
    /// Use `pages` erase blocks starting at `base` for the ring.
    pub fn new(flash: F, base: u32, pages: usize) -> Result<Self, Error> {
        let unit = F::WRITE_SIZE;
        if unit == 0 || unit > MAX_WRITE_SIZE || unit % F::READ_SIZE != 0 {
            return Err(Error::Layout);
        }
        if pages < 2 || STORE_CELLS % pages != 0 {
            return Err(Error::Layout);
        }
        let cells_per_page = STORE_CELLS / pages;
        if cells_per_page * 2 * unit > F::ERASE_SIZE {
            return Err(Error::Layout);
        }
        let end = base as usize + pages * F::ERASE_SIZE;
        if base as usize % F::ERASE_SIZE != 0 || end > flash.capacity() {
            return Err(Error::Layout);
        }

        Ok(Self {
            flash,
            base,
            cells_per_page,
        })
    }

    pub fn into_inner(self) -> F {
        self.flash
    }

    fn page_offset(&self, cell: usize) -> u32 {
        self.base + ((cell / self.cells_per_page) * F::ERASE_SIZE) as u32
    }

    fn cell_offset(&self, cell: usize) -> Result<u32, Error> {
        if cell >= STORE_CELLS {
            return Err(Error::CellOutOfRange);
        }
        let slot = cell % self.cells_per_page;
        Ok(self.page_offset(cell) + (slot * 2 * F::WRITE_SIZE) as u32)
    }
}

impl<F: NorFlash> Cells for FlashCells<F> {
    fn read(&mut self, cell: usize) -> Result<u8, Error> {
        let offset = self.cell_offset(cell)?;
        let unit = F::WRITE_SIZE;
        let mut buf = [0u8; 2 * MAX_WRITE_SIZE];
        self.flash
            .read(offset, &mut buf[..2 * unit])
            .map_err(|_| Error::Flash)?;

        let retired = buf[unit..2 * unit].iter().any(|&b| b != 0xFF);
        if retired {
            Ok(ERASED)
        } else {
            Ok(buf[0])
        }
    }

    fn write(&mut self, cell: usize, value: u8) -> Result<(), Error> {
        let offset = self.cell_offset(cell)?;
        if cell % self.cells_per_page == 0 {
            let page = self.page_offset(cell);
            #[cfg(feature = "defmt")]
            trace!("FlashCells: erase page @{=u32:#x}", page);
            self.flash
                .erase(page, page + F::ERASE_SIZE as u32)
                .map_err(|_| Error::Flash)?;
        }

        let mut buf = [0xFFu8; MAX_WRITE_SIZE];
        buf[0] = value;
        self.flash
            .write(offset, &buf[..F::WRITE_SIZE])
            .map_err(|_| Error::Flash)
    }

    fn erase(&mut self, cell: usize) -> Result<(), Error> {
        let offset = self.cell_offset(cell)? + F::WRITE_SIZE as u32;
        let buf = [0u8; MAX_WRITE_SIZE];
        self.flash
            .write(offset, &buf[..F::WRITE_SIZE])
            .map_err(|_| Error::Flash)
    }
}
