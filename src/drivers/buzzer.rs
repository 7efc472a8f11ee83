//! Piezo buzzer driver (self-oscillating buzzer on a GPIO).
//!
//! Patterns are built from two tone lengths and one gap, all from
//! [`BeepTiming`].  Every call blocks the loop for the pattern's duration.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::AudioSignal;
use crate::config::BeepTiming;

pub struct Buzzer<P, D> {
    pin: P,
    delay: D,
    timing: BeepTiming,
}

impl<P: OutputPin, D: DelayNs> Buzzer<P, D> {
    pub fn new(mut pin: P, delay: D, timing: BeepTiming) -> Self {
        if let Err(e) = pin.set_low() {
            warn!("buzzer: failed to silence at init: {:?}", e);
        }
        Self { pin, delay, timing }
    }

    fn tone(&mut self, ms: u16) {
        if let Err(e) = self.pin.set_high() {
            warn!("buzzer: pin write failed: {:?}", e);
            return;
        }
        self.delay.delay_ms(u32::from(ms));
        if let Err(e) = self.pin.set_low() {
            warn!("buzzer: pin write failed: {:?}", e);
        }
    }

    fn repeat(&mut self, count: u8, ms: u16) {
        for i in 0..count {
            if i > 0 {
                self.delay.delay_ms(u32::from(self.timing.gap_ms));
            }
            self.tone(ms);
        }
    }
}

impl<P: OutputPin, D: DelayNs> AudioSignal for Buzzer<P, D> {
    fn beep(&mut self) {
        self.tone(self.timing.short_ms);
    }

    fn beep_multi(&mut self, count: u8) {
        self.repeat(count, self.timing.short_ms);
    }

    fn beep_long(&mut self) {
        self.tone(self.timing.long_ms);
    }

    fn beep_long_multi(&mut self, count: u8) {
        self.repeat(count, self.timing.long_ms);
    }

    fn beep_byte(&mut self, pattern: u8) {
        for bit in (0..8).rev() {
            if pattern & (1 << bit) != 0 {
                self.tone(self.timing.short_ms);
            } else {
                self.delay.delay_ms(u32::from(self.timing.short_ms));
            }
            self.delay.delay_ms(u32::from(self.timing.gap_ms));
        }
    }
}
