//! capmem firmware for nRF52840.
//!
//! # Hardware
//!
//! - **Output**: LED driver gate on PWM0 (P0.13), 8-bit duty
//! - **Memory capacitor**: sensed on AIN0 (P0.02), recharged from P0.29
//!   through a resistor once the boot decision is made
//! - **Supply**: resistor divider on AIN1 (P0.03)
//! - **Mode storage**: last two internal flash pages (see `memory.x`)
//!
//! The controller is fully blocking. Delays use `embassy_time::block_for`,
//! the 2 Hz tick arms an RTC alarm and waits in WFE, and shutdown enters
//! System OFF with no wake source configured.

#![no_std]
#![no_main]

use core::future::Future;
use core::pin::pin;
use core::task::{Context, Waker};

use capmem::config::{
    MIN_PULSE_US, STORE_FLASH_OFFSET, STORE_FLASH_PAGES, SUPPLY_SAMPLE_INTERVAL_MS, TICK_PERIOD_MS,
};
use capmem::{Board, FlashCells, ModeController, DEFAULT_TABLES};
use defmt::info;
use embassy_futures::block_on;
use embassy_nrf::gpio::{Flex, OutputDrive};
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::pwm::SimplePwm;
use embassy_nrf::saadc::{self, ChannelConfig, Saadc};
use embassy_nrf::{bind_interrupts, pac, peripherals};
use embassy_time::{block_for, Duration, Instant, Timer};
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
});

const CAP_CHANNEL: usize = 0;
const SUPPLY_CHANNEL: usize = 1;

/// Full-scale SAADC reading at the default 12-bit resolution.
const ADC_FULL_SCALE: i16 = 4095;

struct NrfBoard {
    pwm: SimplePwm<'static, peripherals::PWM0>,
    saadc: Saadc<'static, 2>,
    /// Left disconnected until the boot sample is taken so the capacitor
    /// cannot drain through the charge resistor.
    cap_charge: Flex<'static>,
    next_tick: Instant,
    next_supply: Instant,
    tick_enabled: bool,
}

impl NrfBoard {
    fn sample(&mut self, channel: usize) -> u8 {
        let mut buf = [0i16; 2];
        block_on(self.saadc.sample(&mut buf));
        (buf[channel].clamp(0, ADC_FULL_SCALE) >> 4) as u8
    }
}

impl Board for NrfBoard {
    fn set_output_level(&mut self, level: u8) {
        self.pwm.set_duty(0, u16::from(level));
    }

    fn read_capacitor_voltage(&mut self) -> u8 {
        // First conversion after enabling the ADC is unreliable.
        let _ = self.sample(CAP_CHANNEL);
        self.sample(CAP_CHANNEL)
    }

    fn charge_memory_capacitor(&mut self) {
        self.cap_charge.set_high();
        self.cap_charge.set_as_output(OutputDrive::Standard);
    }

    fn supply_sample_ready(&mut self) -> bool {
        Instant::now() >= self.next_supply
    }

    fn read_supply_voltage(&mut self) -> u8 {
        self.next_supply = Instant::now() + Duration::from_millis(SUPPLY_SAMPLE_INTERVAL_MS);
        self.sample(SUPPLY_CHANNEL)
    }

    fn delay_ms(&mut self, ms: u16) {
        if ms == 0 {
            block_for(Duration::from_micros(MIN_PULSE_US));
        } else {
            block_for(Duration::from_millis(u64::from(ms)));
        }
    }

    fn sleep_until_next_tick(&mut self) {
        if !self.tick_enabled {
            return;
        }
        let period = Duration::from_millis(TICK_PERIOD_MS);
        self.next_tick += period;
        let now = Instant::now();
        if self.next_tick < now {
            self.next_tick = now + period;
        }
        sleep_until(self.next_tick);
    }

    fn disable_periodic_tick(&mut self) {
        self.tick_enabled = false;
    }

    fn enter_terminal_sleep(&mut self) {
        info!("System OFF");
        pac::POWER.systemoff().write(|w| w.set_systemoff(true));
        cortex_m::asm::dsb();
        cortex_m::asm::wfe();
    }
}

/// Wait for `deadline` with the core in WFE.
///
/// Each poll of the timer (re)arms the RTC alarm, whose interrupt ends the
/// WFE; no waker is needed because the deadline is re-checked every wake-up.
fn sleep_until(deadline: Instant) {
    let mut timer = pin!(Timer::at(deadline));
    let mut cx = Context::from_waker(Waker::noop());
    while timer.as_mut().poll(&mut cx).is_pending() {
        cortex_m::asm::wfe();
    }
}

#[cortex_m_rt::entry]
fn main() -> ! {
    let p = embassy_nrf::init(Default::default());
    info!("capmem starting");

    let mut pwm = SimplePwm::new_1ch(p.PWM0, p.P0_13);
    pwm.set_max_duty(u16::from(u8::MAX));
    pwm.set_duty(0, 0);

    let saadc = Saadc::new(
        p.SAADC,
        Irqs,
        saadc::Config::default(),
        [
            ChannelConfig::single_ended(p.P0_02),
            ChannelConfig::single_ended(p.P0_03),
        ],
    );
    block_on(saadc.calibrate());

    let cap_charge = Flex::new(p.P0_29);

    let now = Instant::now();
    let board = NrfBoard {
        pwm,
        saadc,
        cap_charge,
        next_tick: now,
        next_supply: now,
        tick_enabled: true,
    };

    let cells = match FlashCells::new(Nvmc::new(p.NVMC), STORE_FLASH_OFFSET, STORE_FLASH_PAGES) {
        Ok(cells) => cells,
        Err(e) => defmt::panic!("mode storage region invalid: {:?}", e),
    };

    ModeController::boot(board, cells, &DEFAULT_TABLES).run()
}
