//! Hardware services the mode controller runs on.
//!
//! Timer/PWM setup, ADC setup, sleep modes and interrupt wiring stay on the
//! board side; the controller only sees these blocking calls. Samples are
//! scaled to 0-255.

pub trait Board {
    /// Set the instantaneous output intensity.
    fn set_output_level(&mut self, level: u8);

    /// One sample of the off-time memory capacitor. Called once per boot.
    fn read_capacitor_voltage(&mut self) -> u8;

    /// Charge the memory capacitor so the next power-up can measure off-time.
    fn charge_memory_capacitor(&mut self);

    /// `true` once a fresh supply sample is available.
    fn supply_sample_ready(&mut self) -> bool;

    /// Sample the supply voltage.
    fn read_supply_voltage(&mut self) -> u8;

    /// Busy wait. `0` means the shortest pulse the board can produce.
    fn delay_ms(&mut self, ms: u16);

    /// Idle until the next periodic tick.
    fn sleep_until_next_tick(&mut self);

    /// Stop the periodic tick so nothing wakes the core again.
    fn disable_periodic_tick(&mut self);

    /// Deepest sleep with no wake source. Only an external power cycle
    /// restarts the core.
    fn enter_terminal_sleep(&mut self);
}
