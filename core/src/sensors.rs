//! Sensor sampling and calibration
//!
//! Each read is single-shot: faults are mapped to `ChannelValue::Fault`
//! and never retried. One faulted channel says nothing about the
//! others.

use log::{info, warn};
use soilnode_hal::{AirSensor, AnalogChannel, SoilTempProbe};

use crate::config::DeviceConfig;
use crate::reading::{ChannelValue, SensorReading};

/// Samples all four environmental channels for one cycle
pub struct SensorReader<M, P, A> {
    moisture_adc: M,
    probe: P,
    air: A,
    wet_raw: u16,
    dry_raw: u16,
}

impl<M, P, A> SensorReader<M, P, A>
where
    M: AnalogChannel,
    P: SoilTempProbe,
    A: AirSensor,
{
    /// Swapped calibration thresholds are normalized so the mapping
    /// below never underflows.
    pub fn new(moisture_adc: M, probe: P, air: A, config: &DeviceConfig) -> Self {
        let wet_raw = config.moisture_wet_raw.min(config.moisture_dry_raw);
        let dry_raw = config.moisture_wet_raw.max(config.moisture_dry_raw);
        Self {
            moisture_adc,
            probe,
            air,
            wet_raw,
            dry_raw,
        }
    }

    /// Soil moisture in percent
    ///
    /// The raw count is constrained to the calibration range and
    /// mapped linearly to 0..=100 with inverted polarity: a lower raw
    /// count means wetter soil and a higher percentage. Always yields
    /// a number; there is no fault path.
    pub fn read_soil_moisture(&mut self) -> f32 {
        let raw = self.moisture_adc.read_raw();
        if self.wet_raw == self.dry_raw {
            warn!("degenerate moisture calibration (raw: {}), reporting dry", raw);
            return 0.0;
        }
        let constrained = raw.clamp(self.wet_raw, self.dry_raw);
        let span = (self.dry_raw - self.wet_raw) as f32;
        let moisture = (self.dry_raw - constrained) as f32 * 100.0 / span;
        info!("soil moisture: {}% (raw: {})", moisture, raw);
        moisture
    }

    /// Soil temperature in °F, or a fault if the probe is disconnected
    pub fn read_soil_temperature(&mut self) -> ChannelValue {
        match self.probe.read_celsius() {
            Ok(celsius) => {
                let fahrenheit = celsius * 9.0 / 5.0 + 32.0;
                info!("soil temperature: {}F ({}C)", fahrenheit, celsius);
                ChannelValue::Valid(fahrenheit)
            }
            Err(e) => {
                warn!("soil temperature probe: {}", e);
                ChannelValue::Fault
            }
        }
    }

    /// Air temperature in °F, or a fault if the read failed
    pub fn read_air_temperature(&mut self) -> ChannelValue {
        match self.air.read_temperature() {
            Ok(fahrenheit) => {
                info!("air temperature: {}F", fahrenheit);
                ChannelValue::Valid(fahrenheit)
            }
            Err(e) => {
                warn!("air temperature: {}", e);
                ChannelValue::Fault
            }
        }
    }

    /// Relative air humidity in percent, or a fault if the read failed
    pub fn read_air_humidity(&mut self) -> ChannelValue {
        match self.air.read_humidity() {
            Ok(humidity) => {
                info!("air humidity: {}%", humidity);
                ChannelValue::Valid(humidity)
            }
            Err(e) => {
                warn!("air humidity: {}", e);
                ChannelValue::Fault
            }
        }
    }

    /// Sample all four channels
    pub fn read_all(&mut self) -> SensorReading {
        SensorReading {
            soil_moisture: self.read_soil_moisture(),
            soil_temp: self.read_soil_temperature(),
            air_temp: self.read_air_temperature(),
            air_humidity: self.read_air_humidity(),
        }
    }
}
