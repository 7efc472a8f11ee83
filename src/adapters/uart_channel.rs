//! ESP-IDF UART as a [`ByteChannel`].
//!
//! The host link is a USB-UART bridge on UART1.  Reads never block; the
//! driver's RX ring buffer holds bytes that arrive while the transport is
//! disarmed.

use esp_idf_svc::hal::delay::{BLOCK, NON_BLOCK};
use esp_idf_svc::hal::uart::UartDriver;
use esp_idf_svc::sys::EspError;

use super::stream_transport::ByteChannel;

impl ByteChannel for UartDriver<'_> {
    type Error = EspError;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, EspError> {
        UartDriver::read(self, buf, NON_BLOCK)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize, EspError> {
        UartDriver::write(self, data)
    }

    fn flush(&mut self) -> Result<(), EspError> {
        self.wait_tx_done(BLOCK)
    }

    fn tx_pending(&self) -> bool {
        self.wait_tx_done(NON_BLOCK).is_err()
    }
}
