//! GPIO / peripheral assignments for the turret controller board.
//!
//! Single source of truth for pin numbers and bus/PWM settings.  `main`
//! takes the typed pins from `Peripherals`; keep both in step.

// ---------------------------------------------------------------------------
// Laser diode (low-side MOSFET, PWM dimmed)
// ---------------------------------------------------------------------------

pub const LASER_PWM_GPIO: i32 = 4;
/// LEDC frequency for the laser power stage.
pub const LASER_PWM_FREQ_HZ: u32 = 5_000;

// ---------------------------------------------------------------------------
// Gimbal servos (standard 50 Hz hobby servos)
// ---------------------------------------------------------------------------

pub const SERVO_PAN_GPIO: i32 = 5;
pub const SERVO_TILT_GPIO: i32 = 6;
/// Must match `BridgeConfig::servo_period_us`.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;

// ---------------------------------------------------------------------------
// Buzzer and status LED
// ---------------------------------------------------------------------------

/// Active buzzer, HIGH = sounding.
pub const BUZZER_GPIO: i32 = 7;
pub const STATUS_LED_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// I²C bus (MLX90614 IR thermometer)
// ---------------------------------------------------------------------------

pub const I2C_SDA_GPIO: i32 = 14;
pub const I2C_SCL_GPIO: i32 = 15;
/// SMBus limit for the MLX90614.
pub const I2C_FREQ_HZ: u32 = 100_000;

// ---------------------------------------------------------------------------
// Host link (UART1 via USB-UART bridge; the console stays on USB-JTAG)
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 17;
pub const UART_RX_GPIO: i32 = 18;
pub const UART_BAUD: u32 = 115_200;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution for the servos (bits).  14 bits at 50 Hz gives
/// ~1.2 us per step.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
/// LEDC timer resolution for the laser (bits).  8-bit matches the 0–255
/// power byte.
pub const LASER_PWM_RESOLUTION_BITS: u32 = 8;
