//! Bridge configuration parameters
//!
//! Hardware timing and peripheral defaults for the bridge.
//! Values are fixed at build time; `validate()` guards the ones the clock
//! and drivers divide by.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Core bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    // --- Clock ---
    /// Timer input clock (Hz) feeding the free-running tick counter
    pub timer_clock_hz: u32,
    /// Timer prescaler ratio (1:N)
    pub timer_prescaler: u16,
    /// Epoch seconds reported before the host sends SET_TIME
    pub boot_epoch_secs: u32,

    // --- Laser ---
    /// Power restored by LASER_TOGGLE when no earlier level is known.
    pub laser_default_power: u8,

    // --- Buzzer ---
    pub beep: BeepTiming,

    // --- Gimbal ---
    /// Servo pulse width at 0 degrees (microseconds)
    pub servo_min_pulse_us: u16,
    /// Servo pulse width at 360 degrees (microseconds)
    pub servo_max_pulse_us: u16,
    /// Servo PWM frame period (microseconds)
    pub servo_period_us: u16,
}

/// Buzzer pattern timing (milliseconds).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BeepTiming {
    pub short_ms: u16,
    pub long_ms: u16,
    pub gap_ms: u16,
}

impl BridgeConfig {
    /// Counter increments per second after the prescaler.
    pub fn tick_hz(&self) -> f32 {
        self.timer_clock_hz as f32 / f32::from(self.timer_prescaler)
    }

    /// Reject values that would break the clock or the drivers.
    pub fn validate(&self) -> Result<(), Error> {
        if self.timer_clock_hz == 0 {
            return Err(Error::Config("timer clock is zero"));
        }
        if self.timer_prescaler == 0 {
            return Err(Error::Config("timer prescaler is zero"));
        }
        if u32::from(self.timer_prescaler) > self.timer_clock_hz {
            return Err(Error::Config("timer prescaler exceeds clock"));
        }
        if self.beep.short_ms == 0 || self.beep.long_ms == 0 {
            return Err(Error::Config("beep duration is zero"));
        }
        if self.servo_min_pulse_us >= self.servo_max_pulse_us {
            return Err(Error::Config("servo pulse range is empty"));
        }
        if self.servo_max_pulse_us > self.servo_period_us {
            return Err(Error::Config("servo pulse exceeds frame period"));
        }
        Ok(())
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            // Clock: 32 MHz / 256 = 125 kHz, 8 us per tick
            timer_clock_hz: 32_000_000,
            timer_prescaler: 256,
            boot_epoch_secs: 58_008,

            // Laser
            laser_default_power: 10,

            // Buzzer
            beep: BeepTiming {
                short_ms: 60,
                long_ms: 400,
                gap_ms: 80,
            },

            // Gimbal (full-rotation servos)
            servo_min_pulse_us: 500,
            servo_max_pulse_us: 2500,
            servo_period_us: 20_000, // 50 Hz
        }
    }
}
