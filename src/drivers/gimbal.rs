//! Pan/tilt gimbal driver: two full-rotation hobby servos.
//!
//! Each axis maps `[0, 360]` degrees linearly onto a pulse width between
//! `servo_min_pulse_us` and `servo_max_pulse_us`, expressed as a duty
//! fraction of the servo frame period.

use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::GimbalControl;
use crate::config::BridgeConfig;

#[derive(Debug, Clone, Copy)]
struct PulseRange {
    min_us: u16,
    max_us: u16,
    period_us: u16,
}

impl PulseRange {
    fn pulse_for(self, degrees: f32) -> u16 {
        let span = f32::from(self.max_us - self.min_us);
        let fraction = degrees.clamp(0.0, 360.0) / 360.0;
        self.min_us + (fraction * span) as u16
    }
}

pub struct ServoGimbal<P> {
    pan: P,
    tilt: P,
    range: PulseRange,
    pan_deg: f32,
    tilt_deg: f32,
}

impl<P: SetDutyCycle> ServoGimbal<P> {
    /// Take both servo channels and centre nothing: the servos hold their
    /// power-on position until the host sends an angle.
    pub fn new(pan: P, tilt: P, config: &BridgeConfig) -> Self {
        Self {
            pan,
            tilt,
            range: PulseRange {
                min_us: config.servo_min_pulse_us,
                max_us: config.servo_max_pulse_us,
                period_us: config.servo_period_us,
            },
            pan_deg: 0.0,
            tilt_deg: 0.0,
        }
    }

    pub fn pan(&self) -> f32 {
        self.pan_deg
    }

    pub fn tilt(&self) -> f32 {
        self.tilt_deg
    }

    fn drive(channel: &mut P, range: PulseRange, degrees: f32, axis: &str) -> bool {
        let pulse = range.pulse_for(degrees);
        match channel.set_duty_cycle_fraction(pulse, range.period_us) {
            Ok(()) => true,
            Err(e) => {
                warn!("gimbal: {} pulse {} us failed: {:?}", axis, pulse, e);
                false
            }
        }
    }
}

impl<P: SetDutyCycle> GimbalControl for ServoGimbal<P> {
    fn set_pan(&mut self, degrees: f32) {
        if Self::drive(&mut self.pan, self.range, degrees, "pan") {
            self.pan_deg = degrees;
        }
    }

    fn set_tilt(&mut self, degrees: f32) {
        if Self::drive(&mut self.tilt, self.range, degrees, "tilt") {
            self.tilt_deg = degrees;
        }
    }
}
