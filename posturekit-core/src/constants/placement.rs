//! Visibility Floors and Debounce for Camera-Placement Validation
//!
//! A frame is only trusted for scoring when the joints its metrics depend on
//! are confidently visible. The floors below are per-joint-group visibility
//! minimums; a frame failing any of them routes to repositioning guidance
//! instead of history.

// ===== VISIBILITY FLOORS =====

/// Minimum visibility for the primary-side ear.
///
/// The neck angle is measured ear-to-shoulder; a barely-visible ear makes it
/// noise. Checked first, overridden by the hip and shoulder checks below.
pub const EAR_VISIBILITY_FLOOR: f32 = 0.90;

/// Minimum for the better of the two hip visibilities.
///
/// The torso angle needs at least one trustworthy hip. Overrides an ear
/// failure: without a hip there is no torso reference at all.
pub const HIP_VISIBILITY_FLOOR: f32 = 0.75;

/// Minimum for the worse of the two shoulder visibilities.
///
/// Both shoulders feed the offset metric and anchor both angles, so the
/// weaker one gates the frame. Highest-priority check; overrides ear and
/// hip failures.
pub const SHOULDER_VISIBILITY_FLOOR: f32 = 0.93;

// ===== SIDE DEBOUNCE =====

/// Frames the primary-side choice is held before being re-evaluated.
///
/// Ear visibility flickers frame to frame; re-picking the analyzed side on
/// every frame would flip the neck measurement with it. At a nominal 30 fps
/// this holds the side for two seconds.
pub const SIDE_DEBOUNCE_FRAMES: u32 = 60;
