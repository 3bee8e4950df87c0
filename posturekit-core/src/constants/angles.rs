//! Geometric Thresholds for Metric Extraction
//!
//! All angles are in integer degrees relative to the vertical axis through
//! the lower point of a body segment, signed negative when the upper point
//! sits to the left of the lower one in image space.

// ===== SEGMENT GEOMETRY =====

/// Angle reported for a degenerate segment whose endpoints share a y
/// coordinate.
///
/// A horizontal segment has no meaningful inclination to the vertical; 90°
/// is the limit value and avoids a division by zero in the projection.
pub const VERTICAL_DEGENERATE_ANGLE_DEG: i32 = 90;

/// Degrees per radian, used when converting `acos` output.
pub const DEG_PER_RAD: f32 = 57.295_78;

// ===== POSTURE CLASSIFICATION =====

/// Torso inclination above which the subject counts as leaning back.
///
/// Used together with [`NECK_ALIGNMENT_THRESHOLD_DEG`] to distinguish a
/// deliberate recline (head following the torso) from slouching.
pub const LEANING_TORSO_ANGLE_DEG: i32 = 20;

/// Maximum neck/torso divergence for the head to count as aligned with a
/// reclined torso.
pub const NECK_ALIGNMENT_THRESHOLD_DEG: i32 = 15;

/// Torso inclination at or below which the subject counts as markedly
/// reclined (negative: upper point left of / behind the lower one).
pub const RECLINED_TORSO_ANGLE_DEG: i32 = -30;

/// Divisor applied to the relative neck angle when the torso is markedly
/// reclined.
///
/// Empirical correction: in deep recline the ear-shoulder segment reads
/// steeper than the neck actually is, over-flagging otherwise fine seating.
/// Tunable, not a hard law.
pub const RECLINED_NECK_CORRECTION: f32 = 1.5;
