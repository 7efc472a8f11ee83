//! Hardware adapter: bridges the peripheral drivers to the decoder's ports.
//!
//! Owns one driver per capability and forwards each port call to it, so a
//! single `&mut HardwareAdapter` satisfies
//! [`PeripheralPort`](crate::app::ports::PeripheralPort).  This is the only
//! type the main loop hands to the decoder.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{
    AudioSignal, GimbalControl, LaserControl, StatusIndicator, TemperatureSensor,
};

/// Concrete adapter that combines all peripherals behind the port traits.
pub struct HardwareAdapter<L, G, A, T, S, D> {
    pub laser: L,
    pub gimbal: G,
    pub audio: A,
    pub thermometer: T,
    pub indicator: S,
    pub delay: D,
}

impl<L, G, A, T, S, D> HardwareAdapter<L, G, A, T, S, D> {
    pub fn new(laser: L, gimbal: G, audio: A, thermometer: T, indicator: S, delay: D) -> Self {
        Self {
            laser,
            gimbal,
            audio,
            thermometer,
            indicator,
            delay,
        }
    }
}

// ── LaserControl ──────────────────────────────────────────────

impl<L: LaserControl, G, A, T, S, D> LaserControl for HardwareAdapter<L, G, A, T, S, D> {
    fn set_power(&mut self, level: u8) {
        self.laser.set_power(level);
    }

    fn power(&self) -> u8 {
        self.laser.power()
    }
}

// ── GimbalControl ─────────────────────────────────────────────

impl<L, G: GimbalControl, A, T, S, D> GimbalControl for HardwareAdapter<L, G, A, T, S, D> {
    fn set_pan(&mut self, degrees: f32) {
        self.gimbal.set_pan(degrees);
    }

    fn set_tilt(&mut self, degrees: f32) {
        self.gimbal.set_tilt(degrees);
    }
}

// ── AudioSignal ───────────────────────────────────────────────

impl<L, G, A: AudioSignal, T, S, D> AudioSignal for HardwareAdapter<L, G, A, T, S, D> {
    fn beep(&mut self) {
        self.audio.beep();
    }

    fn beep_multi(&mut self, count: u8) {
        self.audio.beep_multi(count);
    }

    fn beep_long(&mut self) {
        self.audio.beep_long();
    }

    fn beep_long_multi(&mut self, count: u8) {
        self.audio.beep_long_multi(count);
    }

    fn beep_byte(&mut self, pattern: u8) {
        self.audio.beep_byte(pattern);
    }
}

// ── TemperatureSensor ─────────────────────────────────────────

impl<L, G, A, T: TemperatureSensor, S, D> TemperatureSensor
    for HardwareAdapter<L, G, A, T, S, D>
{
    fn object_temperature(&mut self) -> u16 {
        self.thermometer.object_temperature()
    }

    fn object_temperature_2(&mut self) -> u16 {
        self.thermometer.object_temperature_2()
    }

    fn ambient_temperature(&mut self) -> u16 {
        self.thermometer.ambient_temperature()
    }
}

// ── StatusIndicator ───────────────────────────────────────────

impl<L, G, A, T, S: StatusIndicator, D> StatusIndicator for HardwareAdapter<L, G, A, T, S, D> {
    fn toggle(&mut self) {
        self.indicator.toggle();
    }

    fn set(&mut self, on: bool) {
        self.indicator.set(on);
    }

    fn is_on(&mut self) -> bool {
        self.indicator.is_on()
    }
}

// ── Delay ─────────────────────────────────────────────────────

impl<L, G, A, T, S, D: DelayNs> DelayNs for HardwareAdapter<L, G, A, T, S, D> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
