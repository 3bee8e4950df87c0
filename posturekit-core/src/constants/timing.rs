//! Window Durations, Cooldowns, and Emission Intervals
//!
//! All durations are in milliseconds on the pipeline's [`Timestamp`] axis.
//!
//! [`Timestamp`]: crate::time::Timestamp

/// Milliseconds per second.
pub const MS_PER_SECOND: u64 = 1000;

/// Nominal camera frame rate the pipeline is paced by.
pub const DEFAULT_CAMERA_FPS: u32 = 30;

/// Max age of the short (telemetry) history window: 30 s.
///
/// Short enough that emitted averages track the current sitting position,
/// long enough to smooth single-frame score jitter.
pub const SHORT_WINDOW_MS: u64 = 30 * MS_PER_SECOND;

/// Max age of the long (alert) history window: 120 s.
///
/// Alerts fire on sustained bad posture, not a stretch or a glance at the
/// floor; two minutes of averaging filters those out.
pub const LONG_WINDOW_MS: u64 = 120 * MS_PER_SECOND;

/// Minimum time between actuator triggers: 300 s.
///
/// A buzz every few seconds trains the user to ignore the device. Five
/// minutes gives them time to actually correct before being reminded again.
pub const ALERT_COOLDOWN_MS: u64 = 300 * MS_PER_SECOND;

/// Minimum time between telemetry emissions: 30 s.
pub const SEND_INTERVAL_MS: u64 = 30 * MS_PER_SECOND;
