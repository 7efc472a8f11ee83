//! Application core: the transaction loop around the command decoder.
//!
//! All interaction with peripherals, the packet transport and the hardware
//! timer happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real hardware.

pub mod events;
pub mod ports;
pub mod service;
