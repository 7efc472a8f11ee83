//! Free-running 16-bit tick counter.
//!
//! Models the firmware's hardware timer clocked at
//! `timer_clock_hz / timer_prescaler`.  The full 64-bit count is derived
//! from a monotonic microsecond source, so it never wraps; the 16-bit
//! counter is its low half.  Sources:
//!
//! - **`espidf` feature**: `esp_timer_get_time()` (high-resolution
//!   timer, monotonic since boot).
//! - **host builds**: `std::time::Instant` for host-side
//!   testing and simulation.

use crate::app::ports::TickSource;
use crate::config::BridgeConfig;

/// [`TickSource`] backed by the system's monotonic timer.
pub struct MonotonicTicks {
    timer_clock_hz: u64,
    prescaler: u64,
    #[cfg(feature = "espidf")]
    origin_us: i64,
    #[cfg(not(feature = "espidf"))]
    origin: std::time::Instant,
}

impl MonotonicTicks {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            timer_clock_hz: u64::from(config.timer_clock_hz),
            prescaler: u64::from(config.timer_prescaler),
            #[cfg(feature = "espidf")]
            origin_us: now_us(),
            #[cfg(not(feature = "espidf"))]
            origin: std::time::Instant::now(),
        }
    }

    /// Microseconds since the last reset.
    #[cfg(feature = "espidf")]
    fn elapsed_us(&self) -> u64 {
        now_us().saturating_sub(self.origin_us) as u64
    }

    /// Microseconds since the last reset.
    #[cfg(not(feature = "espidf"))]
    fn elapsed_us(&self) -> u64 {
        self.origin.elapsed().as_micros() as u64
    }
}

#[cfg(feature = "espidf")]
fn now_us() -> i64 {
    unsafe { esp_idf_svc::sys::esp_timer_get_time() }
}

/// Ticks counted in `elapsed_us` by a `clock_hz / prescaler` timer.
fn ticks_at(elapsed_us: u64, clock_hz: u64, prescaler: u64) -> u64 {
    let ticks = u128::from(elapsed_us) * u128::from(clock_hz)
        / (1_000_000 * u128::from(prescaler));
    ticks as u64
}

impl TickSource for MonotonicTicks {
    fn elapsed_ticks(&self) -> u64 {
        ticks_at(self.elapsed_us(), self.timer_clock_hz, self.prescaler)
    }

    fn reset(&mut self) {
        #[cfg(feature = "espidf")]
        {
            self.origin_us = now_us();
        }
        #[cfg(not(feature = "espidf"))]
        {
            self.origin = std::time::Instant::now();
        }
    }
}
