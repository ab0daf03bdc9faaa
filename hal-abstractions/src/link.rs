//! Link radio and session transport traits

/// Session transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// The collector rejected the session connect
    ConnectRejected,
    /// The collector rejected or dropped the publish
    PublishRejected,
    /// Operation attempted without an established session
    NotConnected,
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ConnectRejected => write!(f, "session connect rejected"),
            Self::PublishRejected => write!(f, "publish rejected"),
            Self::NotConnected => write!(f, "session not connected"),
        }
    }
}

impl core::error::Error for SessionError {}

/// Link-layer radio (WiFi or cellular modem)
///
/// `start_connect` kicks off association; the caller polls
/// `is_connected` at its own cadence. The radio never retries on its
/// own.
pub trait LinkRadio {
    /// Begin connecting to the configured network
    fn start_connect(&mut self, ssid: &str, password: &str);

    /// Whether the link is currently associated
    fn is_connected(&mut self) -> bool;

    /// Received signal strength in dBm
    fn rssi(&mut self) -> i16;

    /// Drop the association and power the radio down
    fn power_off(&mut self);
}

impl<T: LinkRadio + ?Sized> LinkRadio for &mut T {
    fn start_connect(&mut self, ssid: &str, password: &str) {
        T::start_connect(self, ssid, password)
    }

    fn is_connected(&mut self) -> bool {
        T::is_connected(self)
    }

    fn rssi(&mut self) -> i16 {
        T::rssi(self)
    }

    fn power_off(&mut self) {
        T::power_off(self)
    }
}

/// Publish/subscribe session over the established link
pub trait SessionTransport {
    /// Open a session with the collector, authenticating with the
    /// device token
    fn connect(&mut self, client_id: &str, token: &str) -> Result<(), SessionError>;

    /// Publish one payload to a topic
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError>;

    /// Close the session
    fn disconnect(&mut self);
}

impl<T: SessionTransport + ?Sized> SessionTransport for &mut T {
    fn connect(&mut self, client_id: &str, token: &str) -> Result<(), SessionError> {
        T::connect(self, client_id, token)
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), SessionError> {
        T::publish(self, topic, payload)
    }

    fn disconnect(&mut self) {
        T::disconnect(self)
    }
}
