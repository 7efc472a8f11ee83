//! Peripheral drivers over `embedded-hal` traits.
//!
//! Each driver implements one capability port from
//! [`app::ports`](crate::app::ports) and is otherwise a dumb actuator or
//! sensor; protocol semantics stay in the decoder.

pub mod buzzer;
pub mod gimbal;
pub mod indicator;
pub mod laser;
pub mod thermometer;
