//! Fuzz target: `PacketDecoder::decode`
//!
//! Decodes an arbitrary 64-byte packet against inert peripherals and
//! asserts that the scan stays inside both packets and that the response
//! tail past `response_len` is untouched.
//!
//! cargo fuzz run fuzz_packet_decoder

#![no_main]

use embedded_hal::delay::DelayNs;
use libfuzzer_sys::fuzz_target;
use turretlink::app::ports::{
    AudioSignal, GimbalControl, LaserControl, StatusIndicator, TemperatureSensor, TickSource,
};
use turretlink::clock::ClockService;
use turretlink::config::BridgeConfig;
use turretlink::protocol::decoder::PacketDecoder;
use turretlink::protocol::{BUF_SIZE, Packet};

#[derive(Default)]
struct Inert {
    power: u8,
    led: bool,
    ticks: u64,
}

impl LaserControl for Inert {
    fn set_power(&mut self, level: u8) {
        self.power = level;
    }
    fn power(&self) -> u8 {
        self.power
    }
}

impl GimbalControl for Inert {
    fn set_pan(&mut self, degrees: f32) {
        assert!((0.0..=360.0).contains(&degrees));
    }
    fn set_tilt(&mut self, degrees: f32) {
        assert!((0.0..=360.0).contains(&degrees));
    }
}

impl AudioSignal for Inert {
    fn beep(&mut self) {}
    fn beep_multi(&mut self, _count: u8) {}
    fn beep_long(&mut self) {}
    fn beep_long_multi(&mut self, _count: u8) {}
    fn beep_byte(&mut self, _pattern: u8) {}
}

impl TemperatureSensor for Inert {
    fn object_temperature(&mut self) -> u16 {
        0x3B49
    }
    fn object_temperature_2(&mut self) -> u16 {
        0x3B10
    }
    fn ambient_temperature(&mut self) -> u16 {
        0x3AF7
    }
}

impl StatusIndicator for Inert {
    fn toggle(&mut self) {
        self.led = !self.led;
    }
    fn set(&mut self, on: bool) {
        self.led = on;
    }
    fn is_on(&mut self) -> bool {
        self.led
    }
}

impl DelayNs for Inert {
    fn delay_ns(&mut self, _ns: u32) {}
}

impl TickSource for Inert {
    fn elapsed_ticks(&self) -> u64 {
        self.ticks
    }
    fn reset(&mut self) {
        self.ticks = 0;
    }
}

fuzz_target!(|data: &[u8]| {
    let config = BridgeConfig::default();
    let mut decoder = PacketDecoder::new(&config);
    let mut clock = ClockService::new(Inert::default(), &config);
    let mut hw = Inert::default();
    let mut out = Packet::new();

    for chunk in data.chunks(BUF_SIZE) {
        let report = decoder.decode(&Packet::from_slice(chunk), &mut out, &mut clock, &mut hw);
        assert!(report.response_len <= BUF_SIZE);
        assert!(report.dispatched + report.unknown_count <= BUF_SIZE);
        assert!(out.as_bytes()[report.response_len..].iter().all(|&b| b == 0));
        clock.source_mut().ticks = clock.source().ticks + 997;
    }
});
