//! Background Tasks and the Frame Loop
//!
//! ## Task layout
//!
//! One cooperative frame loop owns the [`PostureMonitor`] exclusively;
//! everything with I/O latency runs on its own task so a slow network call
//! or a multi-second haptic pulse can never stall posture sampling:
//!
//! - **settings poller** - fetches snapshots forever, publishing each over a
//!   `watch` channel (last write wins, applied whole at a frame boundary)
//! - **heartbeat** - periodic liveness ping, no shared state
//! - **telemetry sender** - drains snapshots the frame loop hands off
//! - **pulse runner** - spawned by [`HapticActuator`](posturekit_connectors::HapticActuator)
//!
//! All tasks watch the same shutdown channel and exit when it fires.

use std::time::Duration;

use posturekit_core::{
    telemetry::ComponentReading,
    time::{Clock, SystemClock},
    PostureMonitor, Settings,
};
use posturekit_connectors::{HapticActuator, HeartbeatSink, SettingsSource, TelemetrySink};

use tokio::io::AsyncRead;
use tokio::sync::{mpsc, watch};

use crate::source::FrameSource;

/// How often the settings poller asks the backend for a fresh snapshot
pub const SETTINGS_POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Fixed delay before retrying a failed settings poll
pub const SETTINGS_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Heartbeat period
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Poll settings forever, publishing each snapshot
///
/// Errors are logged and retried after a fixed short delay; this task never
/// gives up on its own.
pub async fn settings_poller(
    mut source: impl SettingsSource,
    tx: watch::Sender<Settings>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let delay = match source.fetch().await {
            Ok(settings) => {
                if tx.send(settings).is_err() {
                    // Frame loop gone; nothing left to configure
                    return;
                }
                SETTINGS_POLL_INTERVAL
            }
            Err(e) => {
                log::warn!("settings poll failed, retrying: {e}");
                SETTINGS_RETRY_DELAY
            }
        };

        tokio::select! {
            _ = shutdown.changed() => return,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

/// Send heartbeats until shutdown
pub async fn heartbeat_loop(
    mut sink: impl HeartbeatSink,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => return,
            _ = tokio::time::sleep(HEARTBEAT_INTERVAL) => {}
        }
        if let Err(e) = sink.beat().await {
            log::warn!("heartbeat failed: {e}");
        }
    }
}

/// Drain telemetry snapshots from the frame loop and upload them
///
/// A failed upload is logged and dropped; the scheduler emits a fresh
/// snapshot next interval anyway.
pub async fn telemetry_sender(
    mut sink: impl TelemetrySink,
    mut rx: mpsc::Receiver<[ComponentReading; 3]>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => return,
            snapshot = rx.recv() => match snapshot {
                Some(readings) => {
                    if let Err(e) = sink.send(&readings).await {
                        log::warn!("telemetry send failed: {e}");
                    }
                }
                None => return,
            },
        }
    }
}

/// The frame-processing loop
///
/// Owns the monitor exclusively. Per frame: apply any pending settings
/// snapshot, gate on the active session, process, then dispatch alerts and
/// telemetry without blocking - the actuator trigger is fire-and-forget and
/// the telemetry hand-off drops on a full queue rather than waiting.
pub async fn frame_loop<R: AsyncRead + Unpin>(
    mut source: FrameSource<R>,
    mut monitor: PostureMonitor,
    mut settings_rx: watch::Receiver<Settings>,
    telemetry_tx: mpsc::Sender<[ComponentReading; 3]>,
    actuator: HapticActuator,
    mut shutdown: watch::Receiver<bool>,
) {
    let clock = SystemClock;
    let mut was_good: Option<bool> = None;

    loop {
        let frame = tokio::select! {
            _ = shutdown.changed() => return,
            next = source.next_frame() => match next {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    log::info!("pose source ended");
                    return;
                }
                Err(e) => {
                    log::error!("pose source read failed: {e}");
                    return;
                }
            },
        };

        if settings_rx.has_changed().unwrap_or(false) {
            let was_active = monitor.settings().has_active_session;
            let settings = *settings_rx.borrow_and_update();
            monitor.apply_settings(settings);
            log::info!(
                "settings applied: sensitivity {}, session active {}",
                settings.sensitivity,
                settings.has_active_session
            );
            // Short buzz tells the user the device noticed the session start
            if settings.has_active_session && !was_active {
                actuator.feedback();
            }
        }

        if !monitor.settings().has_active_session {
            continue;
        }

        let report = monitor.process_frame(&frame, clock.now());

        if !report.subject_visible {
            log::trace!("subject not visible");
            continue;
        }

        if let Some(guidance) = report.placement_guidance {
            log::debug!("placement {:?}: {guidance}", report.placement);
        }

        if was_good != Some(report.good_posture) {
            if let Some(scores) = report.scores {
                log::info!(
                    "posture {} (neck {:.0}, torso {:.0}, shoulders {:.0})",
                    if report.good_posture { "good" } else { "bad" },
                    scores.neck,
                    scores.torso,
                    scores.shoulders,
                );
            }
            was_good = Some(report.good_posture);
        }

        for alert in &report.alerts {
            log::info!("alert [{}]: {}", alert.component.name(), alert.message);
            actuator.trigger(alert.intensity);
        }

        if let Some(snapshot) = report.telemetry {
            if let Err(e) = telemetry_tx.try_send(snapshot) {
                log::warn!("telemetry queue full, snapshot dropped: {e}");
            }
        }
    }
}
