//! Laser diode driver (PWM-dimmed constant-current stage).
//!
//! Power 0–255 maps linearly onto the PWM duty cycle.  The driver is a
//! dumb actuator: LASER_TOGGLE bookkeeping lives in the decoder.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::LaserControl;

pub struct PwmLaser<P> {
    pwm: P,
    power: u8,
}

impl<P: SetDutyCycle> PwmLaser<P> {
    /// Take the PWM channel and force the laser off.
    pub fn new(mut pwm: P) -> Self {
        if let Err(e) = pwm.set_duty_cycle_fully_off() {
            warn!("laser: failed to switch off at init: {:?}", e);
        }
        Self { pwm, power: 0 }
    }

    pub fn release(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle> LaserControl for PwmLaser<P> {
    fn set_power(&mut self, level: u8) {
        match self.pwm.set_duty_cycle_fraction(u16::from(level), 255) {
            Ok(()) => self.power = level,
            Err(e) => warn!("laser: duty write failed: {:?}", e),
        }
    }

    fn power(&self) -> u8 {
        self.power
    }
}
