//! Battery monitoring - low-voltage step-down ladder.
//!
//! Implements:
//! - Hysteresis: the lowest mode may run down to a lower threshold
//! - Step-down to the lowest mode after sustained low readings
//! - Shutdown once the lowest mode also runs too low
//!
//! The ladder only goes down. A good reading resets the counter but never
//! raises the mode again.

use crate::config::{BATTERY_CRITICAL, BATTERY_LOW, LOW_BATTERY_READINGS, READOUT_THRESHOLDS};
#[cfg(feature = "defmt")]
use defmt::{debug, warn};

/// Where the light sits on the ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// Running a mode above the lowest.
    Normal,
    /// Running the lowest mode.
    Lowest,
    /// Output off, waiting for an external power cycle.
    ShutDown,
}

impl PowerState {
    pub const fn for_index(index: u8) -> Self {
        if index == 0 {
            PowerState::Lowest
        } else {
            PowerState::Normal
        }
    }
}

/// What the controller has to do after a supply sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatteryAction {
    Keep,
    /// Force the running mode to index 0.
    StepDown,
    /// Turn off and halt.
    ShutDown,
}

/// Threshold a sample must reach to count as healthy while running `index`.
pub const fn threshold_for(index: u8) -> u8 {
    match PowerState::for_index(index) {
        PowerState::Lowest => BATTERY_CRITICAL,
        _ => BATTERY_LOW,
    }
}

/// Number of blinks the battery readout shows for a supply sample (0-5).
pub fn blink_count(sample: u8) -> u8 {
    READOUT_THRESHOLDS.iter().filter(|&&t| sample >= t).count() as u8
}

/// Counts consecutive low supply samples.
#[derive(Debug, Default)]
pub struct BatteryMonitor {
    low_readings: u8,
    state: Option<PowerState>,
}

impl BatteryMonitor {
    pub const fn new() -> Self {
        Self {
            low_readings: 0,
            state: None,
        }
    }

    pub fn low_readings(&self) -> u8 {
        self.low_readings
    }

    /// Ladder position after the last check, if any.
    pub fn state(&self) -> Option<PowerState> {
        self.state
    }

    /// Feed one supply sample taken while running primary mode `index`.
    pub fn check(&mut self, sample: u8, index: u8) -> BatteryAction {
        if self.state == Some(PowerState::ShutDown) {
            return BatteryAction::ShutDown;
        }

        if sample < threshold_for(index) {
            self.low_readings = self.low_readings.saturating_add(1);
            #[cfg(feature = "defmt")]
            debug!("Battery: low sample {} ({})", sample, self.low_readings);
        } else {
            self.low_readings = 0;
        }

        if self.low_readings < LOW_BATTERY_READINGS {
            self.state = Some(PowerState::for_index(index));
            return BatteryAction::Keep;
        }

        self.low_readings = 0;
        let (state, action) = match PowerState::for_index(index) {
            PowerState::Normal => (PowerState::Lowest, BatteryAction::StepDown),
            _ => (PowerState::ShutDown, BatteryAction::ShutDown),
        };
        #[cfg(feature = "defmt")]
        warn!("Battery: {:?} -> {:?}", PowerState::for_index(index), state);
        self.state = Some(state);
        action
    }
}
