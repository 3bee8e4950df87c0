//! Posturekit Daemon - Main Entry Point
//!
//! Wires the pipeline core to its collaborators: the pose-estimator stream,
//! the backend (settings, telemetry, heartbeat), and the haptic actuator.
//!
//! Environment:
//! - `API_BASE_URL`, `DEVICE_ID`, `API_KEY` - backend connection (required)
//! - `POSE_SOURCE` - FIFO/replay path for keypoint frames (default: stdin)
//! - `POSTUREKIT_CONFIG` - optional JSON pipeline configuration file
//! - `RUST_LOG` - log filter (default `info`)

mod source;
mod tasks;

use std::process::ExitCode;

use posturekit_core::{PipelineConfig, PostureMonitor, Settings};
use posturekit_connectors::{
    actuator::HapticPin, BackendClient, BackendConfig, ConnectorError, HapticActuator,
};

use source::FrameSource;
use tokio::sync::{mpsc, watch};

/// Stand-in haptic driver that logs instead of driving a motor
///
/// Deployments with real hardware swap in a GPIO PWM implementation of
/// [`HapticPin`]; everything upstream of the pin is identical.
struct LogHapticPin;

#[async_trait::async_trait]
impl HapticPin for LogHapticPin {
    async fn set_duty(&mut self, duty: u8) -> Result<(), ConnectorError> {
        log::info!("haptic duty -> {duty}");
        Ok(())
    }

    async fn off(&mut self) -> Result<(), ConnectorError> {
        log::info!("haptic off");
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }
}

fn env_var(name: &str) -> Result<String, String> {
    std::env::var(name).map_err(|_| format!("{name} must be set"))
}

fn load_pipeline_config() -> Result<PipelineConfig, String> {
    match std::env::var("POSTUREKIT_CONFIG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| format!("cannot read {path}: {e}"))?;
            serde_json::from_str(&raw).map_err(|e| format!("invalid config {path}: {e}"))
        }
        Err(_) => Ok(PipelineConfig::default()),
    }
}

fn backend_config() -> Result<BackendConfig, String> {
    Ok(BackendConfig::new(
        env_var("API_BASE_URL")?,
        env_var("DEVICE_ID")?,
        env_var("API_KEY")?,
    ))
}

async fn run() -> Result<(), String> {
    let config = load_pipeline_config()?;
    let backend = backend_config()?;

    // One client per task; each keeps its own connection stats
    let settings_client =
        BackendClient::new(backend.clone()).map_err(|e| e.to_string())?;
    let telemetry_client =
        BackendClient::new(backend.clone()).map_err(|e| e.to_string())?;
    let heartbeat_client = BackendClient::new(backend).map_err(|e| e.to_string())?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (settings_tx, settings_rx) = watch::channel(Settings::default());
    let (telemetry_tx, telemetry_queue) = mpsc::channel(8);

    let (actuator, actuator_handle) =
        HapticActuator::spawn(LogHapticPin, shutdown_rx.clone());

    let poller = tokio::spawn(tasks::settings_poller(
        settings_client,
        settings_tx,
        shutdown_rx.clone(),
    ));
    let heartbeat = tokio::spawn(tasks::heartbeat_loop(
        heartbeat_client,
        shutdown_rx.clone(),
    ));
    let telemetry = tokio::spawn(tasks::telemetry_sender(
        telemetry_client,
        telemetry_queue,
        shutdown_rx.clone(),
    ));

    let monitor: PostureMonitor = PostureMonitor::new(config);

    // Obtaining a frame source is the one fatal startup condition
    let frames = match std::env::var("POSE_SOURCE") {
        Ok(path) => {
            log::info!("reading pose frames from {path}");
            let source = FrameSource::open(&path)
                .await
                .map_err(|e| format!("cannot open pose source {path}: {e}"))?;
            tokio::spawn(tasks::frame_loop(
                source,
                monitor,
                settings_rx,
                telemetry_tx,
                actuator,
                shutdown_rx,
            ))
        }
        Err(_) => {
            log::info!("reading pose frames from stdin");
            tokio::spawn(tasks::frame_loop(
                FrameSource::from_stdin(),
                monitor,
                settings_rx,
                telemetry_tx,
                actuator,
                shutdown_rx,
            ))
        }
    };

    log::info!("posturekit daemon v{} running", posturekit_core::VERSION);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("shutdown signal received");
        }
        result = frames => {
            log::info!("frame loop finished");
            if let Err(e) = result {
                log::error!("frame loop panicked: {e}");
            }
        }
    }

    // Stop everything; the pulse runner forces the actuator off before it
    // exits, so join it before leaving
    let _ = shutdown_tx.send(true);
    let _ = actuator_handle.await;
    let _ = poller.await;
    let _ = heartbeat.await;
    let _ = telemetry.await;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("startup failed: {e}");
            ExitCode::FAILURE
        }
    }
}
