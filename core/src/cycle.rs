//! One wake cycle, end to end
//!
//! read → connect → encode+publish → sleep. The sequence is straight-
//! line and exception-free: sensor faults ride along in the payload,
//! connection failure skips the publish, and the power-down stage runs
//! no matter what came before it.

use embedded_hal::delay::DelayNs;
use log::{error, info, warn};
use soilnode_hal::{
    AirSensor, AnalogChannel, LinkRadio, SessionTransport, SoilTempProbe, WakeSleep,
};

use crate::config::DeviceConfig;
use crate::connectivity::{ConnectionState, ConnectivityManager};
use crate::power::PowerController;
use crate::reading::SensorReading;
use crate::sensors::SensorReader;
use crate::telemetry::{battery_voltage, TelemetryPayload};

/// Every collaborator one cycle needs, constructed fresh at wake
///
/// There are no module-level handles; the context is built by the
/// harness at wake and consumed by [`run_cycle`].
pub struct CycleContext<M, P, A, B, L, S, D, W> {
    pub config: DeviceConfig,
    pub moisture_adc: M,
    pub probe: P,
    pub air: A,
    pub battery_adc: B,
    pub link: L,
    pub session: S,
    pub delay: D,
    pub sleep: W,
}

/// What the cycle achieved, for the harness and for tests
///
/// Captured just before the power-down transition; on hardware nothing
/// observes it in-cycle.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    pub reading: SensorReading,
    pub connection: ConnectionState,
    pub published: bool,
}

/// Run one acquisition-and-report cycle to completion
///
/// Always terminates in the deep-sleep transition; no upstream fault
/// or connection failure diverts it.
pub fn run_cycle<M, P, A, B, L, S, D, W>(ctx: CycleContext<M, P, A, B, L, S, D, W>) -> CycleReport
where
    M: AnalogChannel,
    P: SoilTempProbe,
    A: AirSensor,
    B: AnalogChannel,
    L: LinkRadio,
    S: SessionTransport,
    D: DelayNs,
    W: WakeSleep,
{
    let CycleContext {
        config,
        moisture_adc,
        probe,
        air,
        mut battery_adc,
        link,
        session,
        delay,
        sleep,
    } = ctx;

    info!("wake cycle start");

    let mut reader = SensorReader::new(moisture_adc, probe, air, &config);
    let reading = reader.read_all();

    let mut connectivity = ConnectivityManager::new(link, session, delay);
    let connection = connectivity.establish(&config);

    let mut published = false;
    if connection == ConnectionState::SessionUp {
        let battery = battery_voltage(battery_adc.read_raw(), &config);
        let rssi = connectivity.signal_strength();
        let payload = TelemetryPayload::new(&reading, battery, rssi);
        match payload.encode() {
            Ok(text) => {
                info!("publishing telemetry: {}", text.as_str());
                match connectivity.publish(config.telemetry_topic, text.as_bytes()) {
                    Ok(()) => {
                        info!("telemetry published");
                        published = true;
                    }
                    Err(e) => error!("telemetry publish failed: {}", e),
                }
            }
            Err(e) => error!("telemetry encoding failed: {}", e),
        }
    } else {
        warn!("collector unreachable ({:?}), skipping publish", connection);
    }

    let power = PowerController::new(sleep, config.sleep_interval_secs);
    power.shutdown(connectivity);

    CycleReport {
        reading,
        connection,
        published,
    }
}
