//! Pipeline Configuration and Hot-Reloadable Settings
//!
//! Two distinct lifetimes of configuration:
//!
//! - [`PipelineConfig`]: everything fixed at startup - curves, window
//!   durations, thresholds. Every constant in [`crate::constants`] surfaces
//!   here as an overridable field.
//! - [`Settings`]: the remotely-managed knobs that change while running.
//!   Settings arrive as a whole snapshot and are applied atomically at the
//!   next frame boundary; the pipeline never sees a half-updated value set.

use crate::{
    constants::{
        angles::{
            LEANING_TORSO_ANGLE_DEG, NECK_ALIGNMENT_THRESHOLD_DEG, RECLINED_NECK_CORRECTION,
            RECLINED_TORSO_ANGLE_DEG,
        },
        placement::{
            EAR_VISIBILITY_FLOOR, HIP_VISIBILITY_FLOOR, SHOULDER_VISIBILITY_FLOOR,
            SIDE_DEBOUNCE_FRAMES,
        },
        timing::{
            ALERT_COOLDOWN_MS, DEFAULT_CAMERA_FPS, LONG_WINDOW_MS, SEND_INTERVAL_MS,
            SHORT_WINDOW_MS,
        },
    },
    score::CurveSet,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default sensitivity threshold when the backend has not supplied one
pub const DEFAULT_SENSITIVITY: u8 = 75;

/// Default actuator intensity
pub const DEFAULT_VIBRATION_INTENSITY: u8 = 100;

/// Startup-time pipeline configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Nominal camera frame rate, used for streak timing
    pub fps: u32,
    /// Per-component calibration curves
    pub curves: CurveSet,
    /// Short (telemetry) window max age, ms
    pub short_window_ms: u64,
    /// Long (alert) window max age, ms
    pub long_window_ms: u64,
    /// Minimum time between actuator triggers, ms
    pub alert_cooldown_ms: u64,
    /// Minimum time between telemetry emissions, ms
    pub send_interval_ms: u64,
    /// Primary-ear visibility floor
    pub ear_visibility_floor: f32,
    /// Best-hip visibility floor
    pub hip_visibility_floor: f32,
    /// Worst-shoulder visibility floor
    pub shoulder_visibility_floor: f32,
    /// Frames the primary side is held before re-evaluation
    pub side_debounce_frames: u32,
    /// Torso inclination above which the subject counts as leaning back, deg
    pub leaning_torso_deg: i32,
    /// Max neck/torso divergence for an aligned reclined head, deg
    pub neck_alignment_deg: i32,
    /// Torso inclination at or below which the recline correction applies, deg
    pub reclined_torso_deg: i32,
    /// Divisor applied to the relative neck angle in deep recline
    pub reclined_neck_correction: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            fps: DEFAULT_CAMERA_FPS,
            curves: CurveSet::default(),
            short_window_ms: SHORT_WINDOW_MS,
            long_window_ms: LONG_WINDOW_MS,
            alert_cooldown_ms: ALERT_COOLDOWN_MS,
            send_interval_ms: SEND_INTERVAL_MS,
            ear_visibility_floor: EAR_VISIBILITY_FLOOR,
            hip_visibility_floor: HIP_VISIBILITY_FLOOR,
            shoulder_visibility_floor: SHOULDER_VISIBILITY_FLOOR,
            side_debounce_frames: SIDE_DEBOUNCE_FRAMES,
            leaning_torso_deg: LEANING_TORSO_ANGLE_DEG,
            neck_alignment_deg: NECK_ALIGNMENT_THRESHOLD_DEG,
            reclined_torso_deg: RECLINED_TORSO_ANGLE_DEG,
            reclined_neck_correction: RECLINED_NECK_CORRECTION,
        }
    }
}

/// Remotely-managed runtime settings
///
/// Polled from the backend; a whole snapshot replaces the previous one
/// (last write wins). Unknown or missing fields keep their defaults so a
/// partial payload cannot zero out a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Settings {
    /// Score threshold below which a component counts as a violation, 0–100
    pub sensitivity: u8,
    /// Actuator intensity for alerts, 0–100
    pub vibration_intensity: u8,
    /// Whether a monitoring session is currently active
    pub has_active_session: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sensitivity: DEFAULT_SENSITIVITY,
            vibration_intensity: DEFAULT_VIBRATION_INTENSITY,
            has_active_session: false,
        }
    }
}

impl Settings {
    /// Clamp both 0–100 knobs into range
    pub fn clamped(self) -> Self {
        Self {
            sensitivity: self.sensitivity.min(100),
            vibration_intensity: self.vibration_intensity.min(100),
            has_active_session: self.has_active_session,
        }
    }
}
