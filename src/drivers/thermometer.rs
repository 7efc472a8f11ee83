//! MLX90614 non-contact IR thermometer.
//!
//! Only the three RAM temperature registers are read, each as a plain
//! SMBus read-word.  Values are returned in the sensor's native format
//! (0.02 K per LSB) and forwarded to the host unconverted.

use embedded_hal::i2c::I2c;
use log::warn;

use crate::app::ports::TemperatureSensor;

/// Factory-default SMBus address.
pub const DEFAULT_ADDRESS: u8 = 0x5A;

/// Returned when the bus transaction fails.  Bit 15 is the sensor's own
/// error flag, so the host treats both the same way.
pub const READ_FAILED: u16 = 0xFFFF;

const REG_T_AMBIENT: u8 = 0x06;
const REG_T_OBJECT_1: u8 = 0x07;
const REG_T_OBJECT_2: u8 = 0x08;

pub struct Mlx90614<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> Mlx90614<I> {
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    fn read_ram(&mut self, register: u8) -> u16 {
        // LSB, MSB, PEC (PEC is not checked)
        let mut buf = [0u8; 3];
        match self.i2c.write_read(self.address, &[register], &mut buf) {
            Ok(()) => u16::from_le_bytes([buf[0], buf[1]]),
            Err(e) => {
                warn!("mlx90614: read of 0x{:02x} failed: {:?}", register, e);
                READ_FAILED
            }
        }
    }
}

impl<I: I2c> TemperatureSensor for Mlx90614<I> {
    fn object_temperature(&mut self) -> u16 {
        self.read_ram(REG_T_OBJECT_1)
    }

    fn object_temperature_2(&mut self) -> u16 {
        self.read_ram(REG_T_OBJECT_2)
    }

    fn ambient_temperature(&mut self) -> u16 {
        self.read_ram(REG_T_AMBIENT)
    }
}
