//! Geometric Metric Extraction from Keypoint Frames
//!
//! ## Overview
//!
//! Turns one [`KeypointFrame`] into the raw geometry the rest of the
//! pipeline scores: neck inclination, torso inclination, shoulder span, and
//! a head-tilted-back flag.
//!
//! Angles are measured against the vertical axis through the *lower* point
//! of each segment (shoulder for the neck, hip for the torso), in image
//! space where y grows downward. The sign carries direction: negative when
//! the upper point sits to the left of the lower one.
//!
//! ## Mandatory joints
//!
//! Both shoulders, at least one ear, and at least one hip must be present.
//! Anything less yields [`PostureError::SubjectNotVisible`] - the frame is
//! degraded, produces no scores, and never enters history.

use crate::{
    constants::angles::{
        DEG_PER_RAD, LEANING_TORSO_ANGLE_DEG, NECK_ALIGNMENT_THRESHOLD_DEG,
        RECLINED_NECK_CORRECTION, RECLINED_TORSO_ANGLE_DEG, VERTICAL_DEGENERATE_ANGLE_DEG,
    },
    errors::{PostureError, PostureResult},
    keypoints::{Keypoint, KeypointFrame, Side},
};

/// Raw geometric metrics for one frame
///
/// Derived, immutable; degrees and pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMetrics {
    /// Ear-to-shoulder inclination, signed integer degrees
    pub neck_angle: i32,
    /// Shoulder-to-hip inclination, signed integer degrees
    pub torso_angle: i32,
    /// Neck/torso divergence as scored (reclined correction applied)
    pub relative_neck_angle: f32,
    /// Pixel distance between the shoulders
    pub shoulder_offset: f32,
    /// Head leaned back rather than slouched forward
    pub is_head_tilted_back: bool,
}

/// Extracts [`RawMetrics`] from keypoint frames
///
/// Holds the geometric thresholds so deployments can retune them without
/// touching the math.
#[derive(Debug, Clone)]
pub struct MetricExtractor {
    /// Torso inclination above which the subject counts as leaning back
    leaning_torso_deg: i32,
    /// Max neck/torso divergence for "head aligned with reclined torso"
    neck_alignment_deg: i32,
    /// Torso inclination at or below which the recline correction applies
    reclined_torso_deg: i32,
    /// Divisor applied to the relative neck angle in deep recline
    reclined_neck_correction: f32,
}

impl Default for MetricExtractor {
    fn default() -> Self {
        Self {
            leaning_torso_deg: LEANING_TORSO_ANGLE_DEG,
            neck_alignment_deg: NECK_ALIGNMENT_THRESHOLD_DEG,
            reclined_torso_deg: RECLINED_TORSO_ANGLE_DEG,
            reclined_neck_correction: RECLINED_NECK_CORRECTION,
        }
    }
}

impl MetricExtractor {
    /// Create an extractor with custom thresholds
    pub fn new(
        leaning_torso_deg: i32,
        neck_alignment_deg: i32,
        reclined_torso_deg: i32,
        reclined_neck_correction: f32,
    ) -> Self {
        Self {
            leaning_torso_deg,
            neck_alignment_deg,
            reclined_torso_deg,
            // A divisor at or below zero would flip or explode the metric
            reclined_neck_correction: if reclined_neck_correction > 0.0 {
                reclined_neck_correction
            } else {
                RECLINED_NECK_CORRECTION
            },
        }
    }

    /// Extract metrics for one frame
    ///
    /// `primary` names the side the placement validator currently trusts;
    /// when that side's ear or hip is missing, whichever side has data is
    /// used instead.
    pub fn extract(&self, frame: &KeypointFrame, primary: Side) -> PostureResult<RawMetrics> {
        let (l_shoulder, r_shoulder) = match (frame.l_shoulder, frame.r_shoulder) {
            (Some(l), Some(r)) => (l, r),
            _ => return Err(PostureError::SubjectNotVisible { missing: "shoulders" }),
        };

        let (ear, ear_side) = match (frame.get(primary.ear()), frame.get(primary.opposite().ear()))
        {
            (Some(kp), _) => (kp, primary),
            (None, Some(kp)) => (kp, primary.opposite()),
            (None, None) => return Err(PostureError::SubjectNotVisible { missing: "ear" }),
        };

        let hip = frame
            .get(primary.hip())
            .or_else(|| frame.get(primary.opposite().hip()))
            .ok_or(PostureError::SubjectNotVisible { missing: "hip" })?;

        // The ear is paired with its own side's shoulder so the neck segment
        // stays in one body plane
        let shoulder = match ear_side {
            Side::Left => l_shoulder,
            Side::Right => r_shoulder,
        };

        let neck_angle = angle_to_vertical(shoulder, ear);
        let torso_angle = angle_to_vertical(hip, shoulder);
        let shoulder_offset = distance(l_shoulder, r_shoulder);

        let relative = ((neck_angle - torso_angle).abs() as f32).min(neck_angle as f32);

        let torso_leaning_back = torso_angle > self.leaning_torso_deg;
        let neck_aligned = relative <= self.neck_alignment_deg as f32;
        let neck_behind_torso = neck_angle < torso_angle;
        let is_head_tilted_back = (torso_leaning_back && neck_aligned) || neck_behind_torso;

        let relative_neck_angle = if torso_angle <= self.reclined_torso_deg {
            relative / self.reclined_neck_correction
        } else {
            relative
        };

        Ok(RawMetrics {
            neck_angle,
            torso_angle,
            relative_neck_angle,
            shoulder_offset,
            is_head_tilted_back,
        })
    }
}

/// Angle between the segment `p1 → p2` and the vertical axis through `p1`
///
/// Signed negative when `p2` is left of `p1`; truncated to integer degrees.
/// A horizontal segment (`y1 == y2`) returns the 90° limit value rather
/// than dividing by zero.
pub fn angle_to_vertical(p1: Keypoint, p2: Keypoint) -> i32 {
    if p1.y == p2.y {
        return VERTICAL_DEGENERATE_ANGLE_DEG;
    }

    let dx = (p2.x - p1.x) as f32;
    let dy = (p2.y - p1.y) as f32;
    let len = libm::sqrtf(dx * dx + dy * dy);

    // Cosine against the upward vertical (0, -1); y grows downward
    let cos_theta = (-dy / len).clamp(-1.0, 1.0);
    let degrees = (libm::acosf(cos_theta) * DEG_PER_RAD) as i32;

    if p2.x < p1.x {
        -degrees
    } else {
        degrees
    }
}

/// Euclidean pixel distance between two keypoints
pub fn distance(a: Keypoint, b: Keypoint) -> f32 {
    let dx = (b.x - a.x) as f32;
    let dy = (b.y - a.y) as f32;
    libm::sqrtf(dx * dx + dy * dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoints::Joint;

    fn kp(x: i32, y: i32) -> Keypoint {
        Keypoint::new(x, y, 1.0)
    }

    /// Frame with every mandatory joint, upright geometry.
    fn upright_frame() -> KeypointFrame {
        KeypointFrame::default()
            .with(Joint::LShoulder, kp(300, 300))
            .with(Joint::RShoulder, kp(380, 300))
            .with(Joint::LEar, kp(300, 200))
            .with(Joint::REar, kp(380, 200))
            .with(Joint::LHip, kp(300, 500))
            .with(Joint::RHip, kp(380, 500))
    }

    #[test]
    fn vertical_segment_is_zero_degrees() {
        assert_eq!(angle_to_vertical(kp(100, 300), kp(100, 100)), 0);
    }

    #[test]
    fn horizontal_segment_hits_degenerate_case() {
        assert_eq!(angle_to_vertical(kp(100, 300), kp(200, 300)), 90);
        assert_eq!(angle_to_vertical(kp(100, 300), kp(0, 300)), 90);
    }

    #[test]
    fn leftward_lean_is_negative() {
        // 3-4-5 triangle: acos(0.8) = 36.87 deg, truncated to 36
        assert_eq!(angle_to_vertical(kp(100, 300), kp(70, 260)), -36);
        assert_eq!(angle_to_vertical(kp(100, 300), kp(130, 260)), 36);
    }

    #[test]
    fn shoulder_distance() {
        assert_eq!(distance(kp(0, 0), kp(30, 40)), 50.0);
    }

    #[test]
    fn upright_frame_extracts_small_angles() {
        let extractor = MetricExtractor::default();
        let metrics = extractor.extract(&upright_frame(), Side::Left).unwrap();

        assert_eq!(metrics.neck_angle, 0);
        assert_eq!(metrics.torso_angle, 0);
        assert_eq!(metrics.relative_neck_angle, 0.0);
        assert_eq!(metrics.shoulder_offset, 80.0);
        assert!(!metrics.is_head_tilted_back);
    }

    #[test]
    fn missing_shoulder_degrades() {
        let mut frame = upright_frame();
        frame.r_shoulder = None;
        let err = MetricExtractor::default().extract(&frame, Side::Left).unwrap_err();
        assert_eq!(err, PostureError::SubjectNotVisible { missing: "shoulders" });
    }

    #[test]
    fn missing_both_ears_degrades_but_one_suffices() {
        let mut frame = upright_frame();
        frame.l_ear = None;

        // Primary side's ear missing: falls back to the right ear
        let metrics = MetricExtractor::default().extract(&frame, Side::Left).unwrap();
        assert_eq!(metrics.neck_angle, 0);

        frame.r_ear = None;
        let err = MetricExtractor::default().extract(&frame, Side::Left).unwrap_err();
        assert_eq!(err, PostureError::SubjectNotVisible { missing: "ear" });
    }

    #[test]
    fn missing_both_hips_degrades() {
        let mut frame = upright_frame();
        frame.l_hip = None;
        frame.r_hip = None;
        let err = MetricExtractor::default().extract(&frame, Side::Left).unwrap_err();
        assert_eq!(err, PostureError::SubjectNotVisible { missing: "hip" });
    }

    #[test]
    fn head_tilted_back_when_neck_behind_torso() {
        // Torso leaning right 30 deg, ear back over the hip line: neck angle
        // ends up smaller than torso angle
        let frame = KeypointFrame::default()
            .with(Joint::LShoulder, kp(416, 300))
            .with(Joint::RShoulder, kp(496, 300))
            .with(Joint::LEar, kp(426, 200))
            .with(Joint::LHip, kp(300, 500))
            .with(Joint::RHip, kp(380, 500));

        let metrics = MetricExtractor::default().extract(&frame, Side::Left).unwrap();
        assert!(metrics.torso_angle > 20);
        assert!(metrics.neck_angle < metrics.torso_angle);
        assert!(metrics.is_head_tilted_back);
    }

    #[test]
    fn reclined_torso_softens_relative_neck_angle() {
        // Torso reclined ~-31 deg (shoulder far left of hip), neck upright
        // relative to image: relative angle gets divided down
        let frame = KeypointFrame::default()
            .with(Joint::LShoulder, kp(180, 300))
            .with(Joint::RShoulder, kp(260, 300))
            .with(Joint::LEar, kp(225, 200))
            .with(Joint::LHip, kp(300, 500))
            .with(Joint::RHip, kp(380, 500));

        let extractor = MetricExtractor::default();
        let metrics = extractor.extract(&frame, Side::Left).unwrap();
        assert!(metrics.torso_angle <= -30);

        let uncorrected =
            ((metrics.neck_angle - metrics.torso_angle).abs() as f32).min(metrics.neck_angle as f32);
        assert_eq!(metrics.relative_neck_angle, uncorrected / 1.5);
    }
}
