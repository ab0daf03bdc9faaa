//! End-of-cycle power-down
//!
//! The shutdown path is the one stage that always runs: it tears the
//! connection down, arms the wake timer, and enters deep sleep. On
//! hardware the sleep call never returns and the next wake is a fresh
//! start; the harness owns re-entry.

use embedded_hal::delay::DelayNs;
use log::info;
use soilnode_hal::{LinkRadio, SessionTransport, WakeSleep};

use crate::connectivity::ConnectivityManager;

/// Issues the irreversible end-of-cycle transition
pub struct PowerController<W> {
    sleep: W,
    sleep_interval_secs: u32,
}

impl<W: WakeSleep> PowerController<W> {
    pub fn new(sleep: W, sleep_interval_secs: u32) -> Self {
        Self {
            sleep,
            sleep_interval_secs,
        }
    }

    /// Tear down the connection and enter deep sleep
    ///
    /// Consumes the controller and the connectivity manager: nothing
    /// runs after this within the cycle. Invoked exactly once, always
    /// last, regardless of what the earlier stages achieved.
    pub fn shutdown<L, S, D>(mut self, mut connectivity: ConnectivityManager<L, S, D>)
    where
        L: LinkRadio,
        S: SessionTransport,
        D: DelayNs,
    {
        connectivity.teardown();
        info!(
            "entering deep sleep for {} seconds",
            self.sleep_interval_secs
        );
        // Drain pending diagnostic output; nothing runs after the
        // transition to pick it up.
        log::logger().flush();
        self.sleep.enter_deep_sleep(self.sleep_interval_secs);
    }
}
