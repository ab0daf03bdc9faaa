//! Per-deployment configuration
//!
//! Everything here is fixed at flash time and loaded once at cycle
//! start; nothing is mutated afterwards.

/// Deployment constants for one node
///
/// Calibration invariant: `moisture_wet_raw < moisture_dry_raw`
/// (capacitive probes read lower when wetter).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Link network name
    pub wifi_ssid: &'static str,
    /// Link network password
    pub wifi_password: &'static str,
    /// Collector hostname
    pub collector_host: &'static str,
    /// Collector port
    pub collector_port: u16,
    /// Session client identifier
    pub client_id: &'static str,
    /// Device access token presented at session connect
    pub device_token: &'static str,
    /// Topic the telemetry payload is published to
    pub telemetry_topic: &'static str,
    /// Raw ADC count with the probe in water
    pub moisture_wet_raw: u16,
    /// Raw ADC count with the probe in dry air
    pub moisture_dry_raw: u16,
    /// ADC full-scale reference in volts
    pub adc_reference_volts: f32,
    /// Battery voltage divider ratio (measured node voltage is
    /// `raw / 4095 * reference * ratio`)
    pub battery_divider_ratio: f32,
    /// Deep sleep interval between wake cycles, in seconds
    pub sleep_interval_secs: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            wifi_ssid: "YOUR_WIFI_SSID",
            wifi_password: "YOUR_WIFI_PASSWORD",
            collector_host: "thingsboard.cloud",
            collector_port: 1883,
            client_id: "soil-sensor-node",
            device_token: "YOUR_DEVICE_TOKEN",
            telemetry_topic: "v1/devices/me/telemetry",
            // Dry soil (in air) ~3500, wet soil (in water) ~1500
            moisture_wet_raw: 1500,
            moisture_dry_raw: 3500,
            adc_reference_volts: 3.3,
            battery_divider_ratio: 2.0,
            // 15 minutes
            sleep_interval_secs: 900,
        }
    }
}
