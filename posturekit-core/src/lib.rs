//! Core posture signal pipeline
//!
//! Turns per-frame body-keypoint measurements into a stable, debounced
//! judgment of posture quality, plus cooldown-gated alert decisions and
//! rate-limited telemetry snapshots.
//!
//! Key constraints:
//! - No allocation in the per-frame hot path
//! - All temporal state driven by timestamps handed in at the frame
//!   boundary, never by an internal clock
//! - A frame that cannot be trusted is routed to guidance, never to history
//!
//! ```no_run
//! use posturekit_core::{PipelineConfig, PostureMonitor, Settings};
//! use posturekit_core::keypoints::KeypointFrame;
//!
//! let mut monitor: PostureMonitor = PostureMonitor::new(PipelineConfig::default());
//! monitor.apply_settings(Settings { has_active_session: true, ..Settings::default() });
//!
//! let frame = KeypointFrame::default();
//! let report = monitor.process_frame(&frame, 0);
//! if let Some(readings) = report.telemetry {
//!     // hand to the telemetry connector
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod alert;
pub mod config;
pub mod constants;
pub mod errors;
pub mod history;
pub mod keypoints;
pub mod metrics;
pub mod pipeline;
pub mod placement;
pub mod score;
pub mod telemetry;
pub mod time;

// Public API
pub use alert::{Alert, AlertCoordinator, AlertPhase};
pub use config::{PipelineConfig, Settings};
pub use errors::{PostureError, PostureResult};
pub use keypoints::{BodyComponent, ComponentScores, KeypointFrame, Side};
pub use pipeline::{FrameReport, PostureMonitor};
pub use placement::{PlacementQuality, PlacementValidator};
pub use score::{CurveSet, ScoreCurve};
pub use telemetry::{ComponentReading, TelemetryScheduler};
pub use time::{Clock, Timestamp};

/// Crate version, for heartbeat payloads and logs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
