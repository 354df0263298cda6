//! Mode controller - boot decision and main loop.
//!
//! Owns the board, the mode store and all runtime state:
//!
//! 1. **Boot** - load the stored mode, classify the press from the memory
//!    capacitor, persist the new mode (every boot), recharge the capacitor
//!    and resolve the mode to a primary index once.
//! 2. **Step** - run one iteration of the active pattern, then feed a supply
//!    sample to the battery monitor if one is ready.
//! 3. **Run** - step until shutdown, then sleep for good.
//!
//! Failures never stop the light: a bad load starts at the first mode and a
//! failed save is only logged.

use crate::board::Board;
use crate::config::STEP_DOWN_COOLDOWN_MS;
use crate::modes::{ModeRef, ModeTables};
use crate::pattern;
use crate::power::{BatteryAction, BatteryMonitor};
use crate::press::PressEvent;
use crate::storage::{Cells, ModeStore};
#[cfg(feature = "defmt")]
use defmt::{info, warn};

/// Outcome of one main-loop iteration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Continue,
    /// Output is off and the tick is disabled; only terminal sleep remains.
    Halted,
}

pub struct ModeController<B, C> {
    board: B,
    store: ModeStore<C>,
    tables: &'static ModeTables,
    /// Resolved primary index of the running mode.
    index: u8,
    battery: BatteryMonitor,
}

impl<B: Board, C: Cells> ModeController<B, C> {
    /// Decide which mode this power-up runs and persist it.
    pub fn boot(mut board: B, cells: C, tables: &'static ModeTables) -> Self {
        let mut store = ModeStore::new(cells);

        let loaded = match store.load() {
            Ok(byte) => ModeRef::from_byte(byte).unwrap_or_default(),
            Err(_e) => {
                #[cfg(feature = "defmt")]
                warn!("Boot: mode load failed: {:?}", _e);
                ModeRef::default()
            }
        };

        let sample = board.read_capacitor_voltage();
        let press = PressEvent::classify(sample);
        let next = press.apply(tables, loaded);

        if let Err(_e) = store.save(next.to_byte()) {
            #[cfg(feature = "defmt")]
            warn!("Boot: mode save failed: {:?}", _e);
        }

        board.charge_memory_capacitor();

        let index = tables.resolve(next).unwrap_or(0);
        #[cfg(feature = "defmt")]
        info!(
            "Boot: cap={} {:?} {:?} -> {:?} (mode {})",
            sample, press, loaded, next, index
        );

        Self {
            board,
            store,
            tables,
            index,
            battery: BatteryMonitor::new(),
        }
    }

    /// Primary index of the running mode.
    pub fn index(&self) -> u8 {
        self.index
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn battery(&self) -> &BatteryMonitor {
        &self.battery
    }

    /// Give back the board and storage medium.
    pub fn into_parts(self) -> (B, C) {
        (self.board, self.store.into_inner())
    }

    /// One pattern iteration followed by a battery check.
    pub fn step(&mut self) -> Step {
        pattern::run_once(&mut self.board, self.tables.mode(self.index));

        if !self.board.supply_sample_ready() {
            return Step::Continue;
        }

        let sample = self.board.read_supply_voltage();
        match self.battery.check(sample, self.index) {
            BatteryAction::Keep => Step::Continue,
            BatteryAction::StepDown => {
                #[cfg(feature = "defmt")]
                warn!("Battery low: mode {} -> 0", self.index);
                self.index = 0;
                self.board.delay_ms(STEP_DOWN_COOLDOWN_MS);
                Step::Continue
            }
            BatteryAction::ShutDown => {
                #[cfg(feature = "defmt")]
                warn!("Battery critical: shutting down");
                self.board.set_output_level(0);
                self.board.disable_periodic_tick();
                Step::Halted
            }
        }
    }

    /// Main loop. Never returns.
    pub fn run(mut self) -> ! {
        while self.step() == Step::Continue {}
        loop {
            self.board.enter_terminal_sleep();
        }
    }
}
