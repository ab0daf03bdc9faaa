//! Two-phase bounded-retry connection establishment
//!
//! Phase 1 brings the link layer up, phase 2 opens the session on top
//! of it. Each phase has its own fixed attempt budget and interval;
//! there is no backoff growth and no cross-phase retry. Exhaustion is
//! not an error: the caller observes the final state and carries on.

use embedded_hal::delay::DelayNs;
use log::{info, warn};
use soilnode_hal::{LinkRadio, SessionError, SessionTransport};

use crate::config::DeviceConfig;

/// Connection progress, strictly ordered
///
/// `SessionUp` is only reachable through `LinkUp`; no state is
/// skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Disconnected,
    LinkUp,
    SessionUp,
}

/// Fixed retry budget for one connection phase
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub interval_ms: u32,
}

/// Link association: 30 polls at 500 ms, ~15 s total
pub const LINK_RETRY: RetryPolicy = RetryPolicy {
    max_attempts: 30,
    interval_ms: 500,
};

/// Session connect: 5 attempts at 2 s, ~10 s total
pub const SESSION_RETRY: RetryPolicy = RetryPolicy {
    max_attempts: 5,
    interval_ms: 2000,
};

/// Drives the link radio and session transport through the two
/// connection phases
pub struct ConnectivityManager<L, S, D> {
    link: L,
    session: S,
    delay: D,
    state: ConnectionState,
    link_retry: RetryPolicy,
    session_retry: RetryPolicy,
}

impl<L, S, D> ConnectivityManager<L, S, D>
where
    L: LinkRadio,
    S: SessionTransport,
    D: DelayNs,
{
    pub fn new(link: L, session: S, delay: D) -> Self {
        Self::with_policies(link, session, delay, LINK_RETRY, SESSION_RETRY)
    }

    /// Construct with explicit retry budgets (used by tests)
    pub fn with_policies(
        link: L,
        session: S,
        delay: D,
        link_retry: RetryPolicy,
        session_retry: RetryPolicy,
    ) -> Self {
        Self {
            link,
            session,
            delay,
            state: ConnectionState::Disconnected,
            link_retry,
            session_retry,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Run both connection phases and return the state reached
    ///
    /// Phase 2 is only attempted if phase 1 succeeded. Failure leaves
    /// the state at whatever was reached; nothing is retried after a
    /// phase has exhausted its budget.
    pub fn establish(&mut self, config: &DeviceConfig) -> ConnectionState {
        if self.bring_up_link(config) {
            self.state = ConnectionState::LinkUp;
            if self.open_session(config) {
                self.state = ConnectionState::SessionUp;
            }
        }
        self.state
    }

    /// Publish one payload over the established session
    pub fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError> {
        if self.state != ConnectionState::SessionUp {
            return Err(SessionError::NotConnected);
        }
        self.session.publish(topic, payload)
    }

    /// Link signal strength in dBm
    pub fn signal_strength(&mut self) -> i16 {
        self.link.rssi()
    }

    /// Close the session (if any) and power the radio down
    pub fn teardown(&mut self) {
        if self.state == ConnectionState::SessionUp {
            self.session.disconnect();
        }
        self.link.power_off();
        self.state = ConnectionState::Disconnected;
    }

    fn bring_up_link(&mut self, config: &DeviceConfig) -> bool {
        info!("connecting to link: {}", config.wifi_ssid);
        self.link.start_connect(config.wifi_ssid, config.wifi_password);

        let mut attempts = 0;
        while attempts < self.link_retry.max_attempts {
            if self.link.is_connected() {
                info!("link up after {} polls", attempts);
                return true;
            }
            self.delay.delay_ms(self.link_retry.interval_ms);
            attempts += 1;
        }

        let connected = self.link.is_connected();
        if !connected {
            warn!("link failed to come up after {} polls", attempts);
        }
        connected
    }

    fn open_session(&mut self, config: &DeviceConfig) -> bool {
        info!(
            "connecting to collector: {}:{}",
            config.collector_host, config.collector_port
        );

        for attempt in 1..=self.session_retry.max_attempts {
            match self.session.connect(config.client_id, config.device_token) {
                Ok(()) => {
                    info!("session up on attempt {}", attempt);
                    return true;
                }
                Err(e) => {
                    warn!(
                        "session connect failed ({}), attempt {}/{}",
                        e, attempt, self.session_retry.max_attempts
                    );
                    self.delay.delay_ms(self.session_retry.interval_ms);
                }
            }
        }

        warn!("session budget exhausted, staying at link layer");
        false
    }
}
