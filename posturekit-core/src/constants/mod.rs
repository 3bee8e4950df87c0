//! Constants for the Posture Pipeline
//!
//! Centralized, documented defaults used throughout the system. All of these
//! are starting values for the corresponding [`crate::config`] fields and can
//! be overridden at construction time.
//!
//! ## Organization
//!
//! - **Angles**: geometric thresholds and corrections for metric extraction
//! - **Placement**: visibility floors and debounce for camera-placement checks
//! - **Timing**: window durations, cooldowns, and emission intervals

/// Geometric thresholds and corrections for metric extraction.
pub mod angles;

/// Visibility floors and debounce for camera-placement validation.
pub mod placement;

/// Window durations, cooldowns, and emission intervals.
pub mod timing;

// Re-export commonly used constants for convenience
pub use angles::{
    LEANING_TORSO_ANGLE_DEG, NECK_ALIGNMENT_THRESHOLD_DEG,
    RECLINED_NECK_CORRECTION, RECLINED_TORSO_ANGLE_DEG,
};

pub use placement::{
    EAR_VISIBILITY_FLOOR, HIP_VISIBILITY_FLOOR, SHOULDER_VISIBILITY_FLOOR,
    SIDE_DEBOUNCE_FRAMES,
};

pub use timing::{
    ALERT_COOLDOWN_MS, DEFAULT_CAMERA_FPS, LONG_WINDOW_MS, MS_PER_SECOND,
    SEND_INTERVAL_MS, SHORT_WINDOW_MS,
};
