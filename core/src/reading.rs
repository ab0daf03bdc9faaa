//! Sensor reading types
//!
//! Channels carry an explicit valid/fault outcome in memory. The
//! legacy `-999.0` sentinel exists only at the wire boundary, where
//! the collector's schema still expects it.

/// Value placed on the wire for a faulted channel
pub const WIRE_FAULT_SENTINEL: f32 = -999.0;

/// Outcome of sampling one channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelValue {
    /// A finite measured value
    Valid(f32),
    /// The sensor reported a failure; there is no value
    Fault,
}

impl ChannelValue {
    pub fn is_fault(self) -> bool {
        matches!(self, Self::Fault)
    }

    /// The value as transmitted: faults become the wire sentinel
    pub fn wire_value(self) -> f32 {
        match self {
            Self::Valid(v) => v,
            Self::Fault => WIRE_FAULT_SENTINEL,
        }
    }
}

/// One cycle's worth of environmental samples
///
/// Channels are independent: any subset may be faulted without
/// affecting the others. Soil moisture is a pure mapping of an analog
/// read and cannot fault.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    /// Soil moisture in percent, 0 (dry) to 100 (wet)
    pub soil_moisture: f32,
    /// Soil temperature in °F
    pub soil_temp: ChannelValue,
    /// Air temperature in °F
    pub air_temp: ChannelValue,
    /// Relative air humidity in percent
    pub air_humidity: ChannelValue,
}
