//! Integration tests - whole power cycles through the public API.
//!
//! Each `boot` is one power-up: the stored mode persists in `Eeprom`
//! between boots, the board and controller do not.

use capmem::config::{BATTERY_CRITICAL, BATTERY_LOW, ERASED, STORE_CELLS};
use capmem::{Board, Cells, Error, ModeController, ModeRef, Step, DEFAULT_TABLES};
use heapless::Vec;

/// Capacitor samples for each press length.
const SHORT: u8 = 200;
const MEDIUM: u8 = 110;
const LONG: u8 = 20;

struct Eeprom {
    cells: [u8; STORE_CELLS],
    writes: [u32; STORE_CELLS],
    /// Lose power after the next write, before the old cell is erased.
    cut_after_write: bool,
}

impl Eeprom {
    fn new() -> Self {
        Self {
            cells: [ERASED; STORE_CELLS],
            writes: [0; STORE_CELLS],
            cut_after_write: false,
        }
    }

    fn live(&self) -> impl Iterator<Item = u8> + '_ {
        self.cells.iter().copied().filter(|&c| c != ERASED)
    }

    fn stored(&self) -> Option<ModeRef> {
        let mut live = self.live();
        let byte = live.next()?;
        assert_eq!(live.next(), None, "more than one live cell");
        ModeRef::from_byte(byte)
    }
}

impl Cells for Eeprom {
    fn read(&mut self, cell: usize) -> Result<u8, Error> {
        self.cells.get(cell).copied().ok_or(Error::CellOutOfRange)
    }

    fn write(&mut self, cell: usize, value: u8) -> Result<(), Error> {
        *self.cells.get_mut(cell).ok_or(Error::CellOutOfRange)? = value;
        self.writes[cell] += 1;
        Ok(())
    }

    fn erase(&mut self, cell: usize) -> Result<(), Error> {
        if self.cut_after_write {
            return Err(Error::Flash);
        }
        *self.cells.get_mut(cell).ok_or(Error::CellOutOfRange)? = ERASED;
        Ok(())
    }
}

/// Bench supply: fixed capacitor sample, scripted supply samples and a log
/// of every output level.
struct Bench {
    cap: u8,
    supply: Vec<u8, 16>,
    next_supply: usize,
    levels: Vec<u8, 64>,
    tick_stopped: bool,
}

impl Bench {
    fn new(cap: u8) -> Self {
        Self::with_supply(cap, &[])
    }

    fn with_supply(cap: u8, supply: &[u8]) -> Self {
        Self {
            cap,
            supply: Vec::from_slice(supply).unwrap(),
            next_supply: 0,
            levels: Vec::new(),
            tick_stopped: false,
        }
    }
}

impl Board for Bench {
    fn set_output_level(&mut self, level: u8) {
        self.levels.push(level).unwrap();
    }
    fn read_capacitor_voltage(&mut self) -> u8 {
        self.cap
    }
    fn charge_memory_capacitor(&mut self) {}
    fn supply_sample_ready(&mut self) -> bool {
        self.next_supply < self.supply.len()
    }
    fn read_supply_voltage(&mut self) -> u8 {
        let sample = self.supply[self.next_supply];
        self.next_supply += 1;
        sample
    }
    fn delay_ms(&mut self, _ms: u16) {}
    fn sleep_until_next_tick(&mut self) {}
    fn disable_periodic_tick(&mut self) {
        self.tick_stopped = true;
    }
    fn enter_terminal_sleep(&mut self) {}
}

fn boot(eeprom: &mut Eeprom, cap: u8) -> u8 {
    ModeController::boot(Bench::new(cap), eeprom, &DEFAULT_TABLES).index()
}

#[test]
fn short_presses_cycle_through_every_primary_mode() {
    let mut eeprom = Eeprom::new();
    let modes = DEFAULT_TABLES.len() as u8;
    for press in 1..=2 * modes {
        assert_eq!(boot(&mut eeprom, SHORT), press % modes);
    }
    assert_eq!(eeprom.stored(), Some(ModeRef::Primary(0)));
}

#[test]
fn long_press_returns_to_first_mode() {
    let mut eeprom = Eeprom::new();
    for _ in 0..5 {
        boot(&mut eeprom, SHORT);
    }
    assert_eq!(boot(&mut eeprom, LONG), 0);
    assert_eq!(boot(&mut eeprom, SHORT), 1);
}

#[test]
fn medium_presses_walk_back_through_extended_modes() {
    let mut eeprom = Eeprom::new();
    boot(&mut eeprom, SHORT);
    boot(&mut eeprom, SHORT);

    // Low, moon, then turbo, 24 Hz strobe, battery check and back to moon.
    let expected = [(1, 0x01), (0, 0x00), (4, 0x41), (10, 0x42), (12, 0x43), (0, 0x00)];
    for (index, byte) in expected {
        assert_eq!(boot(&mut eeprom, MEDIUM), index);
        assert_eq!(eeprom.stored().map(ModeRef::to_byte), Some(byte));
    }
}

#[test]
fn short_press_from_extended_mode_continues_after_its_target() {
    let mut eeprom = Eeprom::new();
    assert_eq!(boot(&mut eeprom, MEDIUM), 4);
    assert_eq!(eeprom.stored(), Some(ModeRef::Extended(1)));
    assert_eq!(boot(&mut eeprom, SHORT), 5);
}

#[test]
fn power_loss_during_save_keeps_the_new_mode() {
    let mut eeprom = Eeprom::new();
    for _ in 0..3 {
        boot(&mut eeprom, SHORT);
    }

    eeprom.cut_after_write = true;
    assert_eq!(boot(&mut eeprom, SHORT), 4);
    assert_eq!(eeprom.live().count(), 2);

    eeprom.cut_after_write = false;
    assert_eq!(boot(&mut eeprom, SHORT), 5);
    assert_eq!(eeprom.stored(), Some(ModeRef::Primary(5)));
}

#[test]
fn every_boot_writes_and_wear_stays_even() {
    let mut eeprom = Eeprom::new();
    for _ in 0..STORE_CELLS * 10 {
        boot(&mut eeprom, LONG);
    }
    assert!(eeprom.writes.iter().all(|&w| w == 10));
    assert_eq!(eeprom.live().count(), 1);
}

#[test]
fn flat_battery_steps_down_then_turns_off() {
    let mut eeprom = Eeprom::new();
    for _ in 0..3 {
        boot(&mut eeprom, SHORT);
    }

    let low = BATTERY_LOW - 1;
    let flat = BATTERY_CRITICAL - 1;
    let bench = Bench::with_supply(SHORT, &[low, low, low, flat, flat, flat]);
    let mut ctl = ModeController::boot(bench, &mut eeprom, &DEFAULT_TABLES);
    assert_eq!(ctl.index(), 4);

    let mut steps = 0;
    while ctl.step() == Step::Continue {
        steps += 1;
        assert!(steps < 10, "never shut down");
    }
    assert_eq!(steps, 5);
    assert_eq!(ctl.index(), 0);

    let (bench, _) = ctl.into_parts();
    assert!(bench.tick_stopped);
    assert_eq!(&bench.levels[..], &[255, 255, 255, 1, 1, 1, 0]);

    // Step-down is not persisted; the next power-up starts from turbo.
    assert_eq!(eeprom.stored(), Some(ModeRef::Primary(4)));
    assert_eq!(boot(&mut eeprom, SHORT), 5);
}
