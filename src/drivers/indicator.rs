//! Debug/status LED on a GPIO with a readable output latch.

use embedded_hal::digital::StatefulOutputPin;
use log::warn;

use crate::app::ports::StatusIndicator;

pub struct PinIndicator<P> {
    pin: P,
}

impl<P: StatefulOutputPin> PinIndicator<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: StatefulOutputPin> StatusIndicator for PinIndicator<P> {
    fn toggle(&mut self) {
        if let Err(e) = self.pin.toggle() {
            warn!("indicator: toggle failed: {:?}", e);
        }
    }

    fn set(&mut self, on: bool) {
        let res = if on { self.pin.set_high() } else { self.pin.set_low() };
        if let Err(e) = res {
            warn!("indicator: write failed: {:?}", e);
        }
    }

    fn is_on(&mut self) -> bool {
        self.pin.is_set_high().unwrap_or_else(|e| {
            warn!("indicator: latch read failed: {:?}", e);
            false
        })
    }
}
