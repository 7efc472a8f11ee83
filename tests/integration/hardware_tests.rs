//! The real drivers behind `HardwareAdapter`, driven through the decoder.
//!
//! PWM channels, GPIOs, the I2C bus and the delay provider are faked at the
//! `embedded-hal` trait level, so this covers the driver math (duty
//! fractions, servo pulses, sensor byte order) end to end.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, StatefulOutputPin};
use embedded_hal::i2c::{ErrorKind, I2c, Operation};
use embedded_hal::pwm::SetDutyCycle;

use turretlink::adapters::hardware::HardwareAdapter;
use turretlink::app::ports::LaserControl;
use turretlink::clock::ClockService;
use turretlink::config::BridgeConfig;
use turretlink::drivers::buzzer::Buzzer;
use turretlink::drivers::gimbal::ServoGimbal;
use turretlink::drivers::indicator::PinIndicator;
use turretlink::drivers::laser::PwmLaser;
use turretlink::drivers::thermometer::{self, Mlx90614};
use turretlink::protocol::decoder::PacketDecoder;
use turretlink::protocol::table::*;
use turretlink::protocol::Packet;

use super::mock_hw::ManualTicks;

// ── Fakes ─────────────────────────────────────────────────────

struct FakePwm {
    duty: Rc<Cell<u16>>,
    max: u16,
}

impl embedded_hal::pwm::ErrorType for FakePwm {
    type Error = Infallible;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        self.max
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Infallible> {
        self.duty.set(duty);
        Ok(())
    }
}

/// Output pin that counts rising edges and keeps its latch.
struct FakePin {
    high: bool,
    rises: Rc<Cell<u32>>,
}

impl embedded_hal::digital::ErrorType for FakePin {
    type Error = Infallible;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        if !self.high {
            self.rises.set(self.rises.get() + 1);
        }
        self.high = true;
        Ok(())
    }
}

impl StatefulOutputPin for FakePin {
    fn is_set_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.high)
    }

    fn is_set_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.high)
    }
}

#[derive(Clone)]
struct FakeDelay(Rc<Cell<u64>>);

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + u64::from(ns));
    }
}

/// MLX90614 stand-in: every RAM register reads back a fixed word.
struct FakeBus;

impl embedded_hal::i2c::ErrorType for FakeBus {
    type Error = ErrorKind;
}

impl I2c for FakeBus {
    fn transaction(&mut self, address: u8, ops: &mut [Operation<'_>]) -> Result<(), ErrorKind> {
        if address != thermometer::DEFAULT_ADDRESS {
            return Err(ErrorKind::Other);
        }
        for op in ops {
            if let Operation::Read(buf) = op {
                buf[0] = 0xF7;
                buf[1] = 0x3A;
            }
        }
        Ok(())
    }
}

// ── Rig ───────────────────────────────────────────────────────

struct Taps {
    laser_duty: Rc<Cell<u16>>,
    pan_duty: Rc<Cell<u16>>,
    tilt_duty: Rc<Cell<u16>>,
    buzzer_rises: Rc<Cell<u32>>,
    elapsed_ns: Rc<Cell<u64>>,
}

fn pwm(max: u16) -> (FakePwm, Rc<Cell<u16>>) {
    let duty = Rc::new(Cell::new(0xFFFF));
    (
        FakePwm {
            duty: duty.clone(),
            max,
        },
        duty,
    )
}

#[allow(clippy::type_complexity)]
fn build(
    config: &BridgeConfig,
) -> (
    HardwareAdapter<
        PwmLaser<FakePwm>,
        ServoGimbal<FakePwm>,
        Buzzer<FakePin, FakeDelay>,
        Mlx90614<FakeBus>,
        PinIndicator<FakePin>,
        FakeDelay,
    >,
    Taps,
) {
    let (laser_pwm, laser_duty) = pwm(255);
    let (pan_pwm, pan_duty) = pwm(20_000);
    let (tilt_pwm, tilt_duty) = pwm(20_000);
    let buzzer_rises = Rc::new(Cell::new(0));
    let elapsed_ns = Rc::new(Cell::new(0));
    let delay = FakeDelay(elapsed_ns.clone());

    let hw = HardwareAdapter::new(
        PwmLaser::new(laser_pwm),
        ServoGimbal::new(pan_pwm, tilt_pwm, config),
        Buzzer::new(
            FakePin {
                high: false,
                rises: buzzer_rises.clone(),
            },
            delay.clone(),
            config.beep,
        ),
        Mlx90614::new(FakeBus, thermometer::DEFAULT_ADDRESS),
        PinIndicator::new(FakePin {
            high: false,
            rises: Rc::new(Cell::new(0)),
        }),
        delay,
    );
    let taps = Taps {
        laser_duty,
        pan_duty,
        tilt_duty,
        buzzer_rises,
        elapsed_ns,
    };
    (hw, taps)
}

// ── Tests ─────────────────────────────────────────────────────

#[test]
fn laser_starts_dark() {
    let (_hw, taps) = build(&BridgeConfig::default());
    assert_eq!(taps.laser_duty.get(), 0);
}

#[test]
fn commands_reach_real_drivers() {
    let config = BridgeConfig::default();
    let (mut hw, taps) = build(&config);
    let mut decoder = PacketDecoder::new(&config);
    let mut clock = ClockService::new(ManualTicks::default(), &config);
    let mut out = Packet::new();

    let inbound = Packet::from_slice(&[
        LASER_SET, 0x80,
        SET_PAN, 0x80, 0x00,
        SET_TILT, 0x40, 0x00,
        LED_TOGGLE,
        GET_AMBIENT_TEMP,
    ]);
    let r = decoder.decode(&inbound, &mut out, &mut clock, &mut hw);

    assert_eq!(r.dispatched, 5);
    assert_eq!(taps.laser_duty.get(), 128);
    assert_eq!(hw.laser.power(), 0x80);

    // 180 deg -> 1500 us of a 20 ms frame; 90 deg -> 1000 us
    assert_eq!(taps.pan_duty.get(), 1500);
    assert_eq!(taps.tilt_duty.get(), 1000);
    assert!((hw.gimbal.pan() - 180.0).abs() < 1e-2);
    assert!((hw.gimbal.tilt() - 90.0).abs() < 1e-2);

    assert_eq!(
        &out.as_bytes()[..8],
        &[LASER_SET, SET_PAN, SET_TILT, LED_TOGGLE, 1, GET_AMBIENT_TEMP, 0x3A, 0xF7]
    );
}

#[test]
fn buzzer_and_delays_block_for_their_duration() {
    let config = BridgeConfig::default();
    let (mut hw, taps) = build(&config);
    let mut decoder = PacketDecoder::new(&config);
    let mut clock = ClockService::new(ManualTicks::default(), &config);
    let mut out = Packet::new();

    let inbound = Packet::from_slice(&[BEEP, 0x02, DELAY_MS, 0x00, 0x05, DELAY_US, 0x00, 0x64]);
    decoder.decode(&inbound, &mut out, &mut clock, &mut hw);

    assert_eq!(taps.buzzer_rises.get(), 2);
    let beeps_ms = 2 * u64::from(config.beep.short_ms) + u64::from(config.beep.gap_ms);
    let expected_ns = (beeps_ms + 5) * 1_000_000 + 100_000;
    assert_eq!(taps.elapsed_ns.get(), expected_ns);
}

#[test]
fn unknown_opcode_sounds_long_beep() {
    let config = BridgeConfig::default();
    let (mut hw, taps) = build(&config);
    let mut decoder = PacketDecoder::new(&config);
    let mut clock = ClockService::new(ManualTicks::default(), &config);
    let mut out = Packet::new();

    decoder.decode(&Packet::from_slice(&[0xAB]), &mut out, &mut clock, &mut hw);

    assert_eq!(taps.buzzer_rises.get(), 1);
    assert_eq!(
        taps.elapsed_ns.get(),
        u64::from(config.beep.long_ms) * 1_000_000
    );
}
