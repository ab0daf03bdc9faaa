//! Platform-agnostic cycle logic for a battery-powered soil sensor node
//!
//! One wake cycle: sample four environmental channels, establish a
//! two-layer connection to the collector with bounded retries, publish
//! a telemetry payload, and enter deep sleep. Nothing survives the
//! sleep boundary; every cycle starts from scratch.
//!
//! Hardware is reached only through the traits in `soilnode-hal`, so
//! the whole cycle runs (and is tested) on the host against mock
//! collaborators.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod connectivity;
pub mod cycle;
pub mod power;
pub mod reading;
pub mod sensors;
pub mod telemetry;
