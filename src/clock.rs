//! Combined wall clock: host-set epoch seconds plus a hardware tick counter.
//!
//! The host sets whole seconds with SET_TIME.  Sub-second resolution comes
//! from a free-running timer counting at `timer_clock / prescaler`.  The
//! 16-bit hardware counter wraps every ~524 ms at the default 125 kHz, far
//! shorter than a single DELAY_MS or beep train can block the loop, so the
//! clock reads the source's non-wrapping [`elapsed_ticks`] instead of
//! carrying wraps itself.  Timestamps therefore never go backwards between
//! two `set_time` calls, however long a command blocks.
//!
//! ```text
//!  seconds.millis = epoch + elapsed_ticks * 1000 * prescaler / clock
//! ```
//!
//! The product is computed in integers so whole-millisecond tick counts
//! never truncate to the millisecond below.
//!
//! [`elapsed_ticks`]: TickSource::elapsed_ticks

use log::{debug, info};

use crate::app::ports::TickSource;
use crate::config::BridgeConfig;

/// Documented accuracy of `ms_per_tick` against wall time for the timer
/// clock tree (4.86 %).  Timestamps drift by up to this fraction between
/// SET_TIME calls; the host is expected to resynchronise.
pub const MS_PER_TICK_ERROR_BOUND: f32 = 0.0486;

/// A point in time as reported on the wire: `u32` seconds + `u16` millis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    pub seconds: u32,
    pub millis: u16,
}

impl Timestamp {
    /// Total milliseconds, for ordering and arithmetic.
    pub fn as_millis(self) -> u64 {
        u64::from(self.seconds) * 1000 + u64::from(self.millis)
    }
}

/// Owns the epoch counter and the hardware tick source.
pub struct ClockService<T: TickSource> {
    source: T,
    epoch_secs: u32,
    ms_per_tick: f32,
    timer_clock_hz: u64,
    prescaler: u64,
}

impl<T: TickSource> ClockService<T> {
    /// Start the clock at `config.boot_epoch_secs` with the counter zeroed.
    pub fn new(mut source: T, config: &BridgeConfig) -> Self {
        source.reset();
        let ms_per_tick = 1000.0 / config.tick_hz();
        debug!(
            "clock: {} Hz / {} -> {:.4} ms/tick (+/-{:.2}%)",
            config.timer_clock_hz,
            config.timer_prescaler,
            ms_per_tick,
            MS_PER_TICK_ERROR_BOUND * 100.0
        );
        Self {
            source,
            epoch_secs: config.boot_epoch_secs,
            ms_per_tick,
            timer_clock_hz: u64::from(config.timer_clock_hz),
            prescaler: u64::from(config.timer_prescaler),
        }
    }

    /// Current combined time.
    pub fn timestamp(&self) -> Timestamp {
        let ticks = u128::from(self.source.elapsed_ticks());
        let elapsed_ms = (ticks * 1000 * u128::from(self.prescaler)
            / u128::from(self.timer_clock_hz)) as u64;
        Timestamp {
            seconds: self.epoch_secs.wrapping_add((elapsed_ms / 1000) as u32),
            millis: (elapsed_ms % 1000) as u16,
        }
    }

    /// Replace the epoch and restart sub-second counting from zero.
    pub fn set_time(&mut self, epoch_secs: u32) {
        self.source.reset();
        self.epoch_secs = epoch_secs;
        info!("clock: set to {} s", epoch_secs);
    }

    pub fn epoch_seconds(&self) -> u32 {
        self.epoch_secs
    }

    pub fn ms_per_tick(&self) -> f32 {
        self.ms_per_tick
    }

    pub fn source(&self) -> &T {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut T {
        &mut self.source
    }
}
