//! Sensor-facing traits
//!
//! Each trait covers one bus-attached device. Reads are single-shot:
//! the implementation is expected to complete within its bus timeout
//! and report a failure rather than retry internally.

/// Soil temperature probe errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeError {
    /// The probe did not answer the conversion request
    Disconnected,
}

impl core::fmt::Display for ProbeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "probe disconnected"),
        }
    }
}

impl core::error::Error for ProbeError {}

/// Combined air temperature/humidity sensor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AirSensorError {
    /// The bus read completed but yielded no usable value
    ReadFailed,
}

impl core::fmt::Display for AirSensorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "air sensor read failed"),
        }
    }
}

impl core::error::Error for AirSensorError {}

/// A single-ended analog input channel (12-bit, 0..=4095)
///
/// Used for the capacitive moisture probe and the battery voltage
/// divider.
pub trait AnalogChannel {
    /// Sample the channel once and return the raw ADC count
    fn read_raw(&mut self) -> u16;
}

impl<T: AnalogChannel + ?Sized> AnalogChannel for &mut T {
    fn read_raw(&mut self) -> u16 {
        T::read_raw(self)
    }
}

/// One-wire soil temperature probe
pub trait SoilTempProbe {
    /// Request a conversion and return the temperature in °C
    fn read_celsius(&mut self) -> Result<f32, ProbeError>;
}

impl<T: SoilTempProbe + ?Sized> SoilTempProbe for &mut T {
    fn read_celsius(&mut self) -> Result<f32, ProbeError> {
        T::read_celsius(self)
    }
}

/// Combined air temperature/humidity sensor
///
/// The two reads are independent; one failing says nothing about the
/// other.
pub trait AirSensor {
    /// Air temperature in °F (the node's reporting unit)
    fn read_temperature(&mut self) -> Result<f32, AirSensorError>;

    /// Relative humidity in percent
    fn read_humidity(&mut self) -> Result<f32, AirSensorError>;
}

impl<T: AirSensor + ?Sized> AirSensor for &mut T {
    fn read_temperature(&mut self) -> Result<f32, AirSensorError> {
        T::read_temperature(self)
    }

    fn read_humidity(&mut self) -> Result<f32, AirSensorError> {
        T::read_humidity(self)
    }
}
