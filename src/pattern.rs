//! Output patterns, one loop iteration at a time.
//!
//! | Mode          | One iteration                                        |
//! |---------------|------------------------------------------------------|
//! | Solid         | set level, sleep until the next tick                 |
//! | DualBeacon    | 4 × (flash 5 ms, background 65 ms), pause 720 ms     |
//! | Heartbeat     | flash, 249 ms off, flash, 749 ms off                 |
//! | Strobe        | turbo pulse, `off_ms` off                            |
//! | BatteryCheck  | 1 s off, 0-5 blinks for the supply level, 1 s off    |
//!
//! Every delay blocks; the caller checks the battery between iterations.

use crate::board::Board;
use crate::config::{
    DUAL_BEACON_BACKGROUND_MS, DUAL_BEACON_FLASHES, DUAL_BEACON_FLASH_MS, DUAL_BEACON_PAUSE_MS,
    HEARTBEAT_LONG_GAP_MS, HEARTBEAT_PULSE_MS, HEARTBEAT_SHORT_GAP_MS, LEVEL_TURBO,
    READOUT_BLINK_OFF_MS, READOUT_BLINK_ON_MS, READOUT_LEVEL, READOUT_PAUSE_MS, STROBE_PULSE_MS,
    STROBE_SHORT_PULSE_BELOW_MS,
};
use crate::modes::Mode;
use crate::power::blink_count;

/// Run one iteration of `mode`'s pattern.
pub fn run_once<B: Board>(board: &mut B, mode: Mode) {
    match mode {
        Mode::Solid { level } => {
            board.set_output_level(level);
            board.sleep_until_next_tick();
        }
        Mode::DualBeacon { background, flash } => {
            for _ in 0..DUAL_BEACON_FLASHES {
                board.set_output_level(flash);
                board.delay_ms(DUAL_BEACON_FLASH_MS);
                board.set_output_level(background);
                board.delay_ms(DUAL_BEACON_BACKGROUND_MS);
            }
            board.delay_ms(DUAL_BEACON_PAUSE_MS);
        }
        Mode::Heartbeat => {
            pulse(board, HEARTBEAT_PULSE_MS);
            board.delay_ms(HEARTBEAT_SHORT_GAP_MS);
            pulse(board, HEARTBEAT_PULSE_MS);
            board.delay_ms(HEARTBEAT_LONG_GAP_MS);
        }
        Mode::Strobe { off_ms } => {
            pulse(board, strobe_pulse_ms(off_ms));
            board.delay_ms(u16::from(off_ms));
        }
        Mode::BatteryCheck => {
            let blinks = blink_count(board.read_supply_voltage());
            board.set_output_level(0);
            board.delay_ms(READOUT_PAUSE_MS);
            for _ in 0..blinks {
                board.set_output_level(READOUT_LEVEL);
                board.delay_ms(READOUT_BLINK_ON_MS);
                board.set_output_level(0);
                board.delay_ms(READOUT_BLINK_OFF_MS);
            }
            board.delay_ms(READOUT_PAUSE_MS);
        }
    }
}

/// Fast strobes get the sub-millisecond pulse so the off-time sets the rate.
pub const fn strobe_pulse_ms(off_ms: u8) -> u16 {
    if off_ms < STROBE_SHORT_PULSE_BELOW_MS {
        0
    } else {
        STROBE_PULSE_MS
    }
}

fn pulse<B: Board>(board: &mut B, ms: u16) {
    board.set_output_level(LEVEL_TURBO);
    board.delay_ms(ms);
    board.set_output_level(0);
}
