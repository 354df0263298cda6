//! Application-wide constants and compile-time configuration.
//!
//! All output levels, thresholds, pattern timings, storage geometry and
//! pin assignments live here so they can be tuned in one place.

// Output levels (PWM duty, 0-255)

pub const LEVEL_MOON: u8 = 1;
pub const LEVEL_LOW: u8 = 8;
pub const LEVEL_MED: u8 = 39;
pub const LEVEL_HIGH: u8 = 120;
pub const LEVEL_TURBO: u8 = 255;

// Press classification
//
// The memory capacitor is sampled once at power-up. Its residual charge
// decays with off-time, so a high reading means the switch was only
// tapped. Scale is 0-255.

/// Above this is a "short" press.
pub const CAP_SHORT_THRESHOLD: u8 = 130;

/// Above this (and not short) is a "medium" press. Anything lower is "long".
pub const CAP_MED_THRESHOLD: u8 = 90;

// Battery
//
// Supply samples are 0-255 through the divider; 185 corresponds to a full
// 4.2 V cell, 124 to roughly 3.0 V.

/// Below this, modes above the lowest start counting towards a step-down.
pub const BATTERY_LOW: u8 = 123;

/// Below this, the lowest mode starts counting towards shutdown.
pub const BATTERY_CRITICAL: u8 = 113;

/// Consecutive low samples needed before stepping down.
pub const LOW_BATTERY_READINGS: u8 = 3;

/// Pause after a step-down so a load-dependent sag does not trip again.
pub const STEP_DOWN_COOLDOWN_MS: u16 = 1000;

/// Readout thresholds, ascending and inclusive: one blink per threshold reached.
pub const READOUT_THRESHOLDS: [u8; 5] = [124, 140, 155, 170, 185];

// Pattern timings (ms)

pub const DUAL_BEACON_FLASHES: u8 = 4;
pub const DUAL_BEACON_FLASH_MS: u16 = 5;
pub const DUAL_BEACON_BACKGROUND_MS: u16 = 65;
pub const DUAL_BEACON_PAUSE_MS: u16 = 720;

pub const HEARTBEAT_PULSE_MS: u16 = 1;
pub const HEARTBEAT_SHORT_GAP_MS: u16 = 249;
pub const HEARTBEAT_LONG_GAP_MS: u16 = 749;

/// Strobe on-pulse length.
pub const STROBE_PULSE_MS: u16 = 1;

/// Off-times below this use the sub-millisecond pulse (`delay_ms(0)`) to keep the rate up.
pub const STROBE_SHORT_PULSE_BELOW_MS: u8 = 50;

/// Level the battery readout blinks at.
pub const READOUT_LEVEL: u8 = LEVEL_MED;
pub const READOUT_PAUSE_MS: u16 = 1000;
pub const READOUT_BLINK_ON_MS: u16 = 100;
pub const READOUT_BLINK_OFF_MS: u16 = 400;

// Mode storage

/// Number of one-byte cells in the wear-levelled ring.
pub const STORE_CELLS: usize = 32;

/// Cell value meaning "erased / empty".
pub const ERASED: u8 = 0xFF;

/// Largest encoded mode byte that may be persisted.
pub const MAX_ENCODED: u8 = 0x7F;

/// Flash offset of the storage region (last two 4 KB pages on nRF52840).
/// Must stay outside the FLASH region in `memory.x`.
pub const STORE_FLASH_OFFSET: u32 = 0x000F_E000;

/// Number of flash pages the cell ring is spread over (at least 2).
pub const STORE_FLASH_PAGES: usize = 2;

// Periodic tick & sampling

/// Period of the wake-up tick used by solid modes (2 Hz).
pub const TICK_PERIOD_MS: u64 = 500;

/// Interval at which a fresh supply sample becomes ready.
pub const SUPPLY_SAMPLE_INTERVAL_MS: u64 = 250;

/// Duration standing in for `delay_ms(0)` on hardware.
pub const MIN_PULSE_US: u64 = 300;

// GPIO pin assignments (nRF52840-DK defaults)
//
// These are logical names; the concrete `embassy_nrf::peripherals::*` are
// taken in `main.rs`. Adjust for your custom PCB.
//
//   LED PWM out        → P0.13
//   Memory cap (AIN0)  → P0.02
//   Supply div (AIN1)  → P0.03
//   Cap charge out     → P0.29 (through the charge resistor)
