//! HTTP Backend Client
//!
//! ## Overview
//!
//! One client for all three backend concerns: telemetry upload, settings
//! polling, and heartbeats. The backend exposes a device-scoped REST API;
//! every request is authenticated with the device's API key header.
//!
//! ## Endpoints
//!
//! ```text
//! GET  /api/devices/{device_id}/settings/      → settings snapshot
//! POST /api/devices/{device_id}/posture-data/  ← {"components": [...]}
//! POST /api/devices/{device_id}/heartbeat/     ← {"type": "heartbeat", ...}
//! ```
//!
//! ## Transport
//!
//! Built on the lightweight blocking `ureq` agent, as a deliberate trade:
//! the callers are slow periodic tasks (30 s intervals), not a request
//! fan-out, and a blocking agent keeps the dependency surface small. Each
//! call is a single attempt - the caller's own schedule is the retry policy.

use std::time::Duration;

use posturekit_core::{telemetry::ComponentReading, Settings};

use crate::{ConnectionStats, ConnectorError, HeartbeatSink, SettingsSource, TelemetrySink};

/// Backend connection configuration
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// API base URL, scheme included
    pub base_url: String,
    /// Device identifier used in endpoint paths
    pub device_id: String,
    /// API key sent with every request
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl BackendConfig {
    /// Create a configuration for one device
    pub fn new(
        base_url: impl Into<String>,
        device_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            device_id: device_id.into(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(10),
            user_agent: format!("posturekit/{}", posturekit_core::VERSION),
        }
    }

    /// Set the per-request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// HTTP client for the posture backend
pub struct BackendClient {
    config: BackendConfig,
    agent: ureq::Agent,
    stats: ConnectionStats,
}

impl BackendClient {
    /// Create a client; validates the base URL
    pub fn new(config: BackendConfig) -> Result<Self, ConnectorError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(ConnectorError::Config(
                "base URL must start with http:// or https://".into(),
            ));
        }
        if config.device_id.is_empty() {
            return Err(ConnectorError::Config("device id must not be empty".into()));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self { config, agent, stats: ConnectionStats::default() })
    }

    /// Connection statistics so far
    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    fn device_path(&self, suffix: &str) -> String {
        format!("{}/api/devices/{}/{}", self.config.base_url, self.config.device_id, suffix)
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        self.agent
            .request(method, url)
            .set("X-Api-Key", &self.config.api_key)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
    }

    /// Execute one request, recording stats; returns the raw body
    fn execute(&mut self, request: ureq::Request, body: Option<String>) -> Result<String, ConnectorError> {
        let sent_bytes = body.as_ref().map(|b| b.len() as u64).unwrap_or(0);

        let response = match body {
            Some(json) => request.send_string(&json),
            None => request.call(),
        };

        match response {
            Ok(resp) => {
                self.stats.messages_sent += 1;
                self.stats.bytes_sent += sent_bytes;
                resp.into_string().map_err(|e| ConnectorError::Transport(e.to_string()))
            }
            Err(ureq::Error::Status(status, resp)) => {
                let message = resp.into_string().unwrap_or_default();
                self.record_failure(format!("status {status}"));
                Err(ConnectorError::ServerError { status, message })
            }
            Err(ureq::Error::Transport(e)) => {
                self.record_failure(e.to_string());
                Err(ConnectorError::Transport(e.to_string()))
            }
        }
    }

    fn record_failure(&mut self, error: String) {
        self.stats.messages_failed += 1;
        self.stats.last_error = Some(error);
    }
}

/// Telemetry upload payload shape
pub fn posture_payload(readings: &[ComponentReading]) -> serde_json::Value {
    serde_json::json!({ "components": readings })
}

#[async_trait::async_trait]
impl TelemetrySink for BackendClient {
    async fn send(&mut self, readings: &[ComponentReading]) -> Result<(), ConnectorError> {
        let url = self.device_path("posture-data/");
        let json = serde_json::to_string(&posture_payload(readings))
            .map_err(|e| ConnectorError::Serialization(e.to_string()))?;

        let request = self.request("POST", &url);
        self.execute(request, Some(json))?;
        log::debug!("telemetry sent: {} components", readings.len());
        Ok(())
    }
}

#[async_trait::async_trait]
impl SettingsSource for BackendClient {
    async fn fetch(&mut self) -> Result<Settings, ConnectorError> {
        let url = self.device_path("settings/");
        let request = self.request("GET", &url);
        let body = self.execute(request, None)?;

        let settings: Settings = serde_json::from_str(&body)
            .map_err(|e| ConnectorError::Serialization(e.to_string()))?;
        Ok(settings.clamped())
    }
}

#[async_trait::async_trait]
impl HeartbeatSink for BackendClient {
    async fn beat(&mut self) -> Result<(), ConnectorError> {
        let url = self.device_path("heartbeat/");
        let json = serde_json::json!({
            "type": "heartbeat",
            "version": posturekit_core::VERSION,
        })
        .to_string();

        let request = self.request("POST", &url);
        self.execute(request, Some(json))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use posturekit_core::BodyComponent;

    #[test]
    fn config_validation() {
        assert!(BackendClient::new(BackendConfig::new("ftp://nope", "dev", "key")).is_err());
        assert!(BackendClient::new(BackendConfig::new("https://api.example.com", "", "key"))
            .is_err());
        assert!(
            BackendClient::new(BackendConfig::new("https://api.example.com", "dev", "key")).is_ok()
        );
    }

    #[test]
    fn device_paths_are_scoped() {
        let client =
            BackendClient::new(BackendConfig::new("https://api.example.com", "dev-7", "key"))
                .unwrap();
        assert_eq!(
            client.device_path("settings/"),
            "https://api.example.com/api/devices/dev-7/settings/"
        );
    }

    #[test]
    fn posture_payload_shape() {
        let readings = [
            ComponentReading { component_type: BodyComponent::Neck, score: 88 },
            ComponentReading { component_type: BodyComponent::Torso, score: 92 },
            ComponentReading { component_type: BodyComponent::Shoulders, score: 75 },
        ];
        let payload = posture_payload(&readings);
        assert_eq!(
            payload["components"][0],
            serde_json::json!({"component_type": "neck", "score": 88})
        );
        assert_eq!(payload["components"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn settings_parse_tolerates_partial_payload() {
        let settings: Settings =
            serde_json::from_str(r#"{"sensitivity": 60, "has_active_session": true}"#).unwrap();
        assert_eq!(settings.sensitivity, 60);
        assert!(settings.has_active_session);
    }
}
