//! Hardware abstraction traits for the soil sensor node
//!
//! This crate defines the traits the cycle logic consumes: analog
//! channels, the one-wire soil temperature probe, the combined air
//! sensor, the link radio, the session transport, and the wake-timer/
//! deep-sleep control. BSPs implement these traits; the core never
//! touches hardware directly.

#![no_std]
#![deny(unsafe_code)]

pub mod link;
pub mod power;
pub mod sensors;

pub use link::{LinkRadio, SessionError, SessionTransport};
pub use power::WakeSleep;
pub use sensors::{AirSensor, AirSensorError, AnalogChannel, ProbeError, SoilTempProbe};
