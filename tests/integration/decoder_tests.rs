//! Packet decoder scenarios against the mock peripherals.
//!
//! Each test builds one or more inbound packets byte by byte and checks the
//! peripheral call history plus the exact outbound bytes.

use turretlink::clock::ClockService;
use turretlink::config::BridgeConfig;
use turretlink::protocol::decoder::{DecodeReport, PacketDecoder, StopReason, UnknownOpcode};
use turretlink::protocol::table::*;
use turretlink::protocol::{BUF_SIZE, Packet};

use super::mock_hw::{HwCall, ManualTicks, MockHardware};

struct Rig {
    decoder: PacketDecoder,
    clock: ClockService<ManualTicks>,
    hw: MockHardware,
    out: Packet,
}

impl Rig {
    fn new() -> Self {
        let config = BridgeConfig::default();
        Self {
            decoder: PacketDecoder::new(&config),
            clock: ClockService::new(ManualTicks::default(), &config),
            hw: MockHardware::new(),
            out: Packet::new(),
        }
    }

    /// Blocking delays advance the clock's tick source.
    fn with_timed_delays() -> Self {
        let config = BridgeConfig::default();
        let ticks = ManualTicks::default();
        let hw = MockHardware::with_ticks(&ticks);
        Self {
            decoder: PacketDecoder::new(&config),
            clock: ClockService::new(ticks, &config),
            hw,
            out: Packet::new(),
        }
    }

    fn run(&mut self, bytes: &[u8]) -> DecodeReport {
        let inbound = Packet::from_slice(bytes);
        self.decoder
            .decode(&inbound, &mut self.out, &mut self.clock, &mut self.hw)
    }

    fn response(&self, len: usize) -> &[u8] {
        &self.out.as_bytes()[..len]
    }
}

/// Split a 6-byte wire timestamp into (seconds, millis).
fn wire_time(bytes: &[u8]) -> (u32, u16) {
    (
        u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        u16::from_be_bytes([bytes[4], bytes[5]]),
    )
}

// ── Clock ─────────────────────────────────────────────────────

#[test]
fn get_time_after_set_time_echoes_new_epoch() {
    let mut rig = Rig::new();
    let r = rig.run(&[SET_TIME, 0x65, 0x4B, 0x2C, 0x80, GET_TIME]);

    assert_eq!(r.dispatched, 2);
    assert_eq!(r.clock_set, Some(0x654B_2C80));
    assert_eq!(r.stop, StopReason::Sentinel { offset: 6 });
    assert_eq!(r.response_len, 8);
    assert_eq!(
        rig.response(9),
        &[SET_TIME, GET_TIME, 0x65, 0x4B, 0x2C, 0x80, 0x00, 0x00, 0x00]
    );
    // once at construction, once for SET_TIME
    assert_eq!(rig.clock.source().resets, 2);
}

#[test]
fn get_time_is_monotonic_across_counter_wrap() {
    let mut rig = Rig::new();
    let mut stamps = Vec::new();

    for _ in 0..4 {
        let r = rig.run(&[GET_TIME]);
        assert_eq!(r.response_len, 7);
        stamps.push(wire_time(&rig.out.as_bytes()[1..7]));
        rig.clock.source_mut().advance(40_000);
    }

    assert_eq!(stamps[0], (58_008, 0));
    assert_eq!(stamps[1], (58_008, 320));
    // 80_000 ticks: the counter wrapped once
    assert_eq!(stamps[2], (58_008, 640));
    assert_eq!(stamps[3], (58_008, 960));
    assert!(stamps.windows(2).all(|w| w[0] < w[1]), "{stamps:?}");
}

#[test]
fn blocking_delay_keeps_clock_in_step() {
    let mut rig = Rig::with_timed_delays();
    // 2000 ms is 250_000 ticks: the 16-bit counter wraps three times
    let r = rig.run(&[GET_TIME, DELAY_MS, 0x07, 0xD0, GET_TIME]);

    assert_eq!(r.dispatched, 3);
    assert_eq!(r.response_len, 15);
    let out = rig.out.as_bytes();
    assert_eq!(out[7], DELAY_MS);
    assert_eq!(out[8], GET_TIME);
    let before = wire_time(&out[1..7]);
    let after = wire_time(&out[9..15]);
    assert_eq!(before, (58_008, 0));
    assert_eq!(after, (58_010, 0));
}

#[test]
fn repeated_delays_accumulate_across_packets() {
    let mut rig = Rig::with_timed_delays();
    for _ in 0..3 {
        // 60_000 ms each
        rig.run(&[DELAY_MS, 0xEA, 0x60]);
    }
    rig.run(&[DELAY_US, 0x01, 0xF4, GET_TIME]);
    assert_eq!(wire_time(&rig.out.as_bytes()[2..8]), (58_188, 0));
}

#[test]
fn boot_epoch_timestamp_encoding() {
    let mut rig = Rig::new();
    rig.run(&[GET_TIME]);
    assert_eq!(
        rig.response(7),
        &[GET_TIME, 0x00, 0x00, 0xE2, 0x98, 0x00, 0x00]
    );
}

// ── Gimbal ────────────────────────────────────────────────────

#[test]
fn pan_and_tilt_cover_full_turn() {
    let mut rig = Rig::new();
    let r = rig.run(&[SET_PAN, 0x00, 0x00, SET_TILT, 0xFF, 0xFF]);

    assert_eq!(r.dispatched, 2);
    assert_eq!(rig.response(3), &[SET_PAN, SET_TILT, 0x00]);
    assert_eq!(rig.hw.calls[0], HwCall::Pan(0.0));
    match rig.hw.calls[1] {
        HwCall::Tilt(deg) => assert_eq!(deg, 360.0),
        ref other => panic!("expected tilt, got {other:?}"),
    }
}

#[test]
fn pan_reads_operands_big_endian() {
    let mut rig = Rig::new();
    rig.run(&[SET_PAN, 0x40, 0x00]);
    let deg = rig.hw.last_pan().unwrap();
    assert!((deg - 90.0).abs() < 1e-2, "{deg}");
}

// ── Unknown opcodes ───────────────────────────────────────────

#[test]
fn unknown_opcode_beeps_and_scan_continues() {
    let mut rig = Rig::new();
    let r = rig.run(&[0xFF, GO_FLAG, 0x00]);

    assert_eq!(rig.hw.long_beeps(), 1);
    assert_eq!(r.unknown_count, 1);
    assert_eq!(r.unknown[0], UnknownOpcode { opcode: 0xFF, offset: 0 });
    assert_eq!(r.dispatched, 1);
    assert_eq!(r.response_len, 1);
    assert_eq!(rig.response(2), &[GO_FLAG, 0x00]);
}

#[test]
fn unknown_opcode_does_not_skip_following_bytes() {
    let mut rig = Rig::new();
    // 0x22 is unknown; the byte after it is taken as the next opcode.
    let r = rig.run(&[0x22, LASER_TOGGLE]);

    assert_eq!(r.unknown_count, 1);
    assert_eq!(r.dispatched, 1);
    assert_eq!(rig.hw.power, 10);
    assert_eq!(rig.response(2), &[LASER_TOGGLE, 10]);
}

// ── Laser ─────────────────────────────────────────────────────

#[test]
fn laser_toggle_twice_returns_to_off() {
    let mut rig = Rig::new();
    rig.run(&[LASER_TOGGLE, LASER_TOGGLE]);

    assert_eq!(rig.response(4), &[LASER_TOGGLE, 10, LASER_TOGGLE, 0]);
    assert_eq!(rig.hw.power, 0);
    assert_eq!(rig.hw.calls, vec![HwCall::SetPower(10), HwCall::SetPower(0)]);
}

#[test]
fn first_toggle_after_boot_uses_low_power() {
    let mut rig = Rig::new();
    let r = rig.run(&[LASER_TOGGLE]);

    assert_eq!(r.response_len, 2);
    assert_eq!(rig.hw.calls, vec![HwCall::SetPower(10)]);
}

#[test]
fn laser_toggle_restores_last_set_power() {
    let mut rig = Rig::new();
    rig.run(&[LASER_SET, 0x40, LASER_TOGGLE, LASER_TOGGLE]);

    assert_eq!(
        rig.response(5),
        &[LASER_SET, LASER_TOGGLE, 0x00, LASER_TOGGLE, 0x40]
    );
    assert_eq!(rig.hw.power, 0x40);
}

#[test]
fn laser_set_to_zero_keeps_toggle_restore_level() {
    let mut rig = Rig::new();
    rig.run(&[LASER_SET, 0x20]);
    rig.run(&[LASER_SET, 0x00]);
    rig.run(&[LASER_TOGGLE]);
    // only a toggle-off records the restore level
    assert_eq!(rig.hw.power, 10);
}

// ── Buzzer / indicator / delays ───────────────────────────────

#[test]
fn beep_operand_selects_count() {
    let mut rig = Rig::new();
    rig.run(&[BEEP, 0x03]);
    assert_eq!(rig.hw.calls, vec![HwCall::BeepMulti(3)]);

    let mut rig = Rig::new();
    let r = rig.run(&[BEEP]);
    // the zero padding is consumed as the operand
    assert_eq!(rig.hw.calls, vec![HwCall::Beep]);
    assert_eq!(r.stop, StopReason::Sentinel { offset: 2 });
}

#[test]
fn beep_as_last_byte_has_no_operand() {
    let mut rig = Rig::new();
    let mut bytes = vec![GO_FLAG; BUF_SIZE - 1];
    bytes.push(BEEP);
    let r = rig.run(&bytes);

    assert_eq!(r.stop, StopReason::EndOfBuffer);
    assert_eq!(r.dispatched, BUF_SIZE);
    assert_eq!(r.response_len, BUF_SIZE);
    assert_eq!(rig.hw.calls, vec![HwCall::Beep]);
    assert_eq!(rig.out.as_bytes()[BUF_SIZE - 1], BEEP);
}

#[test]
fn long_and_pattern_beeps() {
    let mut rig = Rig::new();
    rig.run(&[BEEP_LONG, 0x00, BEEP_LONG, 0x02, BEEP_BYTE, 0xA5]);
    assert_eq!(
        rig.hw.calls,
        vec![
            HwCall::BeepLong,
            HwCall::BeepLongMulti(2),
            HwCall::BeepByte(0xA5)
        ]
    );
}

#[test]
fn led_commands_report_latch() {
    let mut rig = Rig::new();
    rig.run(&[LED_TOGGLE, LED_TOGGLE, LED_SET, 0x01]);
    assert_eq!(
        rig.response(6),
        &[LED_TOGGLE, 1, LED_TOGGLE, 0, LED_SET, 1]
    );
    assert!(rig.hw.led);
}

#[test]
fn delays_take_sixteen_bit_operands() {
    let mut rig = Rig::new();
    rig.run(&[DELAY_US, 0x01, 0xF4, DELAY_MS, 0x00, 0x0A]);
    assert_eq!(rig.hw.calls, vec![HwCall::DelayUs(500), HwCall::DelayMs(10)]);
    assert_eq!(rig.response(3), &[DELAY_US, DELAY_MS, 0x00]);
}

// ── Thermometer ───────────────────────────────────────────────

#[test]
fn object_temperature_layout() {
    let mut rig = Rig::new();
    let r = rig.run(&[GET_OBJECT_TEMP_1, GET_OBJECT_TEMP_2]);

    assert_eq!(r.response_len, 22);
    assert_eq!(
        rig.response(11),
        &[GET_OBJECT_TEMP_1, 0x3B, 0x49, 0x00, 0x00, 0x00, 0x00, 0xE2, 0x98, 0x00, 0x00]
    );
    assert_eq!(&rig.out.as_bytes()[11..14], &[GET_OBJECT_TEMP_2, 0x3B, 0x10]);
}

#[test]
fn ambient_temperature_layout() {
    let mut rig = Rig::new();
    let r = rig.run(&[GET_AMBIENT_TEMP]);

    assert_eq!(r.response_len, 9);
    assert_eq!(
        rig.response(9),
        &[GET_AMBIENT_TEMP, 0x3A, 0xF7, 0x00, 0x00, 0xE2, 0x98, 0x00, 0x00]
    );
}

// ── Bounds ────────────────────────────────────────────────────

#[test]
fn truncated_operands_abort_scan() {
    let mut rig = Rig::new();
    let mut bytes = vec![GO_FLAG; BUF_SIZE - 2];
    bytes.extend([SET_TIME, 0x01]);
    let r = rig.run(&bytes);

    assert_eq!(
        r.stop,
        StopReason::TruncatedOperands {
            opcode: SET_TIME,
            offset: BUF_SIZE - 2
        }
    );
    assert_eq!(r.dispatched, BUF_SIZE - 2);
    assert_eq!(r.clock_set, None);
    assert_eq!(rig.clock.source().resets, 1);
}

#[test]
fn response_full_rejects_command() {
    let mut rig = Rig::new();
    let r = rig.run(&[GET_TIME; 10]);

    assert_eq!(r.dispatched, 9);
    assert_eq!(r.response_len, 63);
    assert_eq!(
        r.stop,
        StopReason::ResponseFull {
            opcode: GET_TIME,
            offset: 9
        }
    );
}

#[test]
fn rejected_command_has_no_side_effect() {
    let mut rig = Rig::new();
    let mut bytes = vec![GET_TIME; 9];
    bytes.push(LASER_TOGGLE);
    let r = rig.run(&bytes);

    assert!(matches!(r.stop, StopReason::ResponseFull { opcode: LASER_TOGGLE, .. }));
    assert!(rig.hw.calls.is_empty());
    assert_eq!(rig.hw.power, 0);
}

#[test]
fn echo_only_command_fills_last_byte() {
    let mut rig = Rig::new();
    let mut bytes = vec![GET_TIME; 9];
    bytes.push(GO_FLAG);
    let r = rig.run(&bytes);

    assert_eq!(r.dispatched, 10);
    assert_eq!(r.response_len, BUF_SIZE);
    assert_eq!(r.stop, StopReason::Sentinel { offset: 10 });
}

#[test]
fn full_packet_without_sentinel() {
    let mut rig = Rig::new();
    let r = rig.run(&[GO_FLAG; BUF_SIZE]);
    assert_eq!(r.stop, StopReason::EndOfBuffer);
    assert_eq!(r.response_len, BUF_SIZE);
}

#[test]
fn outbound_is_rebuilt_every_packet() {
    let mut rig = Rig::new();
    rig.run(&[LASER_TOGGLE]);
    assert_eq!(rig.response(2), &[LASER_TOGGLE, 10]);

    let r = rig.run(&[GO_FLAG]);
    assert_eq!(r.response_len, 1);
    assert_eq!(rig.response(2), &[GO_FLAG, 0x00]);
}

#[test]
fn empty_packet_dispatches_nothing() {
    let mut rig = Rig::new();
    let r = rig.run(&[]);
    assert_eq!(r.dispatched, 0);
    assert_eq!(r.response_len, 0);
    assert_eq!(r.stop, StopReason::Sentinel { offset: 0 });
    assert!(rig.out.as_bytes().iter().all(|&b| b == 0));
}
