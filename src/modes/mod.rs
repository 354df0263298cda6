//! Mode tables and the mode-index codec.
//!
//! The primary table lists every concrete output pattern. The extended
//! table is a short list of primary indices (turbo, a fast strobe, battery
//! check) that are only reachable by retreating past the first primary
//! mode. Both index spaces share one persisted byte, see [`ModeRef`].

pub mod mode_ref;


pub use mode_ref::ModeRef;

use crate::config::{LEVEL_HIGH, LEVEL_LOW, LEVEL_MED, LEVEL_MOON, LEVEL_TURBO};

/// Largest number of entries either table may hold (6-bit index).
pub const MAX_TABLE_LEN: usize = 63;

/// One entry of the primary mode table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Constant output.
    Solid { level: u8 },
    /// Four quick flashes over a dim background, then a pause.
    DualBeacon { background: u8, flash: u8 },
    /// Two very short turbo flashes per second.
    Heartbeat,
    /// Turbo pulse followed by `off_ms` of darkness.
    Strobe { off_ms: u8 },
    /// Blink out the battery level.
    BatteryCheck,
}

/// The primary and extended tables, validated at compile time.
#[derive(Debug)]
pub struct ModeTables {
    primary: &'static [Mode],
    extended: &'static [u8],
}

impl ModeTables {
    /// Build a table pair. Panics during const evaluation if the primary
    /// table is empty or either table is longer than [`MAX_TABLE_LEN`], or
    /// if an extended entry points outside the primary table.
    pub const fn new(primary: &'static [Mode], extended: &'static [u8]) -> Self {
        assert!(!primary.is_empty(), "primary mode table is empty");
        assert!(primary.len() <= MAX_TABLE_LEN, "primary mode table too long");
        assert!(extended.len() <= MAX_TABLE_LEN, "extended mode table too long");
        let mut i = 0;
        while i < extended.len() {
            assert!(
                (extended[i] as usize) < primary.len(),
                "extended entry outside primary table"
            );
            i += 1;
        }
        Self { primary, extended }
    }

    pub const fn len(&self) -> usize {
        self.primary.len()
    }

    pub const fn extended_len(&self) -> usize {
        self.extended.len()
    }

    /// Primary table entry for a resolved index. Out-of-range indices fall
    /// back to the first mode.
    pub fn mode(&self, index: u8) -> Mode {
        self.primary
            .get(index as usize)
            .copied()
            .unwrap_or(self.primary[0])
    }

    /// Resolve a reference to a primary index.
    ///
    /// Returns `None` for a direct index outside the primary table or an
    /// extended index of 0 or past the end of the extended table.
    pub fn resolve(&self, raw: ModeRef) -> Option<u8> {
        match raw {
            ModeRef::Primary(index) if (index as usize) < self.primary.len() => Some(index),
            ModeRef::Primary(_) => None,
            ModeRef::Extended(0) => None,
            ModeRef::Extended(n) => self.extended.get(n as usize - 1).copied(),
        }
    }

    /// Next primary mode, wrapping to the first after the last.
    ///
    /// Only defined on direct-form indices; resolve extended references first.
    pub fn advance(&self, index: u8) -> ModeRef {
        let next = index as usize + 1;
        if next >= self.primary.len() {
            ModeRef::Primary(0)
        } else {
            ModeRef::Primary(next as u8)
        }
    }

    /// Previous primary mode. From the first primary mode this steps into
    /// the extended table one entry at a time, then wraps back to primary 0.
    pub fn retreat(&self, raw: ModeRef) -> ModeRef {
        match raw {
            ModeRef::Primary(index) if index > 0 => ModeRef::Primary(index - 1),
            ModeRef::Primary(_) => self.step_extended(0),
            ModeRef::Extended(n) => self.step_extended(n),
        }
    }

    fn step_extended(&self, n: u8) -> ModeRef {
        if (n as usize) < self.extended.len() {
            ModeRef::Extended(n + 1)
        } else {
            ModeRef::Primary(0)
        }
    }
}

const PRIMARY: [Mode; 13] = [
    Mode::Solid { level: LEVEL_MOON },
    Mode::Solid { level: LEVEL_LOW },
    Mode::Solid { level: LEVEL_MED },
    Mode::Solid { level: LEVEL_HIGH },
    Mode::Solid { level: LEVEL_TURBO },
    Mode::DualBeacon { background: LEVEL_MOON, flash: LEVEL_MED },
    Mode::DualBeacon { background: LEVEL_LOW, flash: LEVEL_HIGH },
    Mode::DualBeacon { background: LEVEL_MED, flash: LEVEL_TURBO },
    Mode::Heartbeat,
    // 10 Hz, 24 Hz, 60 Hz
    Mode::Strobe { off_ms: 99 },
    Mode::Strobe { off_ms: 41 },
    Mode::Strobe { off_ms: 15 },
    Mode::BatteryCheck,
];

/// Turbo, 24 Hz strobe, battery check.
const EXTENDED: [u8; 3] = [4, 10, 12];

/// The tables the firmware ships with.
pub static DEFAULT_TABLES: ModeTables = ModeTables::new(&PRIMARY, &EXTENDED);
