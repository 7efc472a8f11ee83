//! Turretlink firmware library.
//!
//! Command bridge for a laser pan/tilt turret: the host sends fixed-size
//! packets of opcode-prefixed commands, the decoder drives the peripherals
//! and answers in a packet of the same size.
//!
//! Exposes the pure-logic modules for integration testing and fuzzing.
//! All ESP-IDF-specific code is guarded by `#[cfg(feature = "espidf")]`
//! within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod clock;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod protocol;
