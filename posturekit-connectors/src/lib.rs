//! Backend and Actuator Connectors for Posturekit
//!
//! ## Overview
//!
//! The pipeline core is transport-free: it decides *what* to emit (telemetry
//! snapshots, alert triggers) and *when*, and this crate carries it over the
//! wire. Three concerns, three traits:
//!
//! - [`TelemetrySink`] - aggregated posture scores to the backend
//! - [`SettingsSource`] - remotely-managed settings snapshots from the backend
//! - [`HeartbeatSink`] - periodic liveness pings
//!
//! plus the [`actuator`] module for the haptic driver, which is local
//! hardware rather than network transport but shares the same rule: failures
//! are logged and absorbed, never propagated into the frame loop.
//!
//! ## Retry policy
//!
//! Connectors make exactly one attempt per call. Every caller already runs
//! on its own schedule - the telemetry interval, the settings poll delay,
//! the heartbeat period - and that schedule *is* the retry throttle. An
//! internal backoff loop would just hide how stale the data actually is.
//!
//! ## Example
//!
//! ```no_run
//! use posturekit_connectors::{BackendConfig, BackendClient, SettingsSource};
//!
//! # async fn example() -> Result<(), posturekit_connectors::ConnectorError> {
//! let mut backend = BackendClient::new(
//!     BackendConfig::new("https://api.example.com", "device-42", "secret-key")
//!         .timeout_secs(10),
//! )?;
//!
//! let settings = backend.fetch().await?;
//! println!("sensitivity: {}", settings.sensitivity);
//! # Ok(())
//! # }
//! ```

use posturekit_core::{telemetry::ComponentReading, Settings};

use thiserror::Error;

pub mod actuator;
pub mod http;

pub use actuator::{HapticActuator, HapticPin, PulseKind};
pub use http::{BackendClient, BackendConfig};

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Device or endpoint is not reachable
    #[error("not connected")]
    NotConnected,

    /// Server answered with a failure status
    #[error("server error {status}: {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Response body, if any
        message: String,
    },

    /// Network-level failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Payload could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid connector configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Connection statistics common to all connectors
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Total messages sent successfully
    pub messages_sent: u64,
    /// Total messages failed to send
    pub messages_failed: u64,
    /// Total bytes sent
    pub bytes_sent: u64,
    /// Last error message
    pub last_error: Option<String>,
}

/// Delivers aggregated posture scores to the backend
#[async_trait::async_trait]
pub trait TelemetrySink: Send {
    /// Send one snapshot of per-component readings
    async fn send(&mut self, readings: &[ComponentReading]) -> Result<(), ConnectorError>;
}

/// Fetches remotely-managed settings snapshots
#[async_trait::async_trait]
pub trait SettingsSource: Send {
    /// Fetch the current settings snapshot
    async fn fetch(&mut self) -> Result<Settings, ConnectorError>;
}

/// Sends periodic liveness pings
#[async_trait::async_trait]
pub trait HeartbeatSink: Send {
    /// Send one heartbeat
    async fn beat(&mut self) -> Result<(), ConnectorError>;
}
