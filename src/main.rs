//! Turretlink firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  HardwareAdapter     StreamPacketTransport   LogEventSink    │
//! │  (PeripheralPort)    (TransportPort, UART)   (EventSink)     │
//! │  MonotonicTicks                                              │
//! │  (TickSource)                                                │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ─────────────────       │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │          BridgeService (pure logic)                │      │
//! │  │  PacketDecoder · ResponseEncoder · ClockService    │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{info, warn};

use esp_idf_svc::hal::delay::{Delay, FreeRtos};
use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver};
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::ledc::config::TimerConfig;
use esp_idf_svc::hal::ledc::{LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::{self, UartDriver};
use esp_idf_svc::hal::units::Hertz;

use turretlink::adapters::hardware::HardwareAdapter;
use turretlink::adapters::log_sink::LogEventSink;
use turretlink::adapters::stream_transport::StreamPacketTransport;
use turretlink::adapters::tick_timer::MonotonicTicks;
use turretlink::app::service::{BridgeService, TickOutcome};
use turretlink::config::BridgeConfig;
use turretlink::drivers::buzzer::Buzzer;
use turretlink::drivers::gimbal::ServoGimbal;
use turretlink::drivers::indicator::PinIndicator;
use turretlink::drivers::laser::PwmLaser;
use turretlink::drivers::thermometer::{self, Mlx90614};
use turretlink::pins;

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Turretlink v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = BridgeConfig::default();
    config.validate()?;
    let p = Peripherals::take()?;

    // ── Laser (8-bit LEDC) ────────────────────────────────────
    let laser_timer = LedcTimerDriver::new(
        p.ledc.timer0,
        &TimerConfig::new()
            .frequency(Hertz(pins::LASER_PWM_FREQ_HZ))
            .resolution(Resolution::Bits8),
    )?;
    let laser = PwmLaser::new(LedcDriver::new(p.ledc.channel0, &laser_timer, p.pins.gpio4)?);

    // ── Gimbal (14-bit LEDC at 50 Hz) ─────────────────────────
    let servo_timer = LedcTimerDriver::new(
        p.ledc.timer1,
        &TimerConfig::new()
            .frequency(Hertz(pins::SERVO_PWM_FREQ_HZ))
            .resolution(Resolution::Bits14),
    )?;
    let gimbal = ServoGimbal::new(
        LedcDriver::new(p.ledc.channel1, &servo_timer, p.pins.gpio5)?,
        LedcDriver::new(p.ledc.channel2, &servo_timer, p.pins.gpio6)?,
        &config,
    );

    // ── Buzzer, LED, thermometer ──────────────────────────────
    let buzzer = Buzzer::new(PinDriver::output(p.pins.gpio7)?, Delay::new_default(), config.beep);
    let indicator = PinIndicator::new(PinDriver::output(p.pins.gpio8)?);
    let i2c = I2cDriver::new(
        p.i2c0,
        p.pins.gpio14,
        p.pins.gpio15,
        &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
    )?;
    let thermometer = Mlx90614::new(i2c, thermometer::DEFAULT_ADDRESS);

    let mut hw = HardwareAdapter::new(
        laser,
        gimbal,
        buzzer,
        thermometer,
        indicator,
        Delay::new_default(),
    );

    // ── Host link ─────────────────────────────────────────────
    let uart = UartDriver::new(
        p.uart1,
        p.pins.gpio17,
        p.pins.gpio18,
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &uart::config::Config::new().baudrate(Hertz(pins::UART_BAUD)),
    )?;
    let mut transport = StreamPacketTransport::new(uart);
    info!(
        "Host link: UART1 tx={} rx={} @ {} baud",
        pins::UART_TX_GPIO,
        pins::UART_RX_GPIO,
        pins::UART_BAUD
    );

    // ── Service ───────────────────────────────────────────────
    let mut sink = LogEventSink::new();
    let mut service = BridgeService::new(&config, MonotonicTicks::new(&config))?;
    service.start(&mut transport, &mut sink)?;
    info!(
        "System ready ({:.4} ms/tick). Entering command loop.",
        service.clock().ms_per_tick()
    );

    loop {
        match service.tick(&mut transport, &mut hw, &mut sink) {
            Ok(TickOutcome::Idle | TickOutcome::Waiting) => FreeRtos::delay_ms(1),
            Ok(_) => {}
            Err(e) => {
                warn!("bridge: {}", e);
                FreeRtos::delay_ms(10);
            }
        }
    }
}
