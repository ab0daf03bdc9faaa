//! Telemetry payload encoding
//!
//! The payload is a fixed six-key JSON object built into a
//! size-bounded buffer. The key set is stable across cycles; there is
//! no schema version. Faulted channels are transmitted unsuppressed as
//! the wire sentinel so the collector sees every key every cycle.

use core::fmt::Write;

use heapless::String;

use crate::config::DeviceConfig;
use crate::reading::SensorReading;

/// Upper bound on the encoded payload
pub const MAX_PAYLOAD_LEN: usize = 256;

/// Payload encoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// The encoded payload did not fit the buffer
    BufferOverflow,
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferOverflow => write!(f, "payload buffer overflow"),
        }
    }
}

impl core::error::Error for EncodeError {}

/// Wire-ready values for one cycle: the four sensor channels plus node
/// metadata
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryPayload {
    pub soil_moisture: f32,
    pub soil_temp: f32,
    pub air_temp: f32,
    pub air_humidity: f32,
    pub battery_voltage: f32,
    pub rssi: i16,
}

impl TelemetryPayload {
    /// Assemble the payload from a reading plus node metadata
    ///
    /// Faulted channels are rendered as their wire sentinel here; this
    /// is the only place the sentinel reappears.
    pub fn new(reading: &SensorReading, battery_voltage: f32, rssi: i16) -> Self {
        Self {
            soil_moisture: reading.soil_moisture,
            soil_temp: reading.soil_temp.wire_value(),
            air_temp: reading.air_temp.wire_value(),
            air_humidity: reading.air_humidity.wire_value(),
            battery_voltage,
            rssi,
        }
    }

    /// Serialize to the fixed-key JSON object
    pub fn encode(&self) -> Result<String<MAX_PAYLOAD_LEN>, EncodeError> {
        let mut out = String::new();
        write!(
            &mut out,
            "{{\"soil_moisture\":{},\"soil_temp\":{},\"air_temp\":{},\"air_humidity\":{},\"battery_voltage\":{},\"rssi\":{}}}",
            self.soil_moisture,
            self.soil_temp,
            self.air_temp,
            self.air_humidity,
            self.battery_voltage,
            self.rssi
        )
        .map_err(|_| EncodeError::BufferOverflow)?;
        Ok(out)
    }
}

/// Battery voltage from the divider channel
///
/// The raw 12-bit count is scaled by the ADC reference and the divider
/// ratio.
pub fn battery_voltage(raw: u16, config: &DeviceConfig) -> f32 {
    f32::from(raw) * config.adc_reference_volts / 4095.0 * config.battery_divider_ratio
}
