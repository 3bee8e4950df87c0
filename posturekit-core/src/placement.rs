//! Camera-Placement Validation with Debounced Side Selection
//!
//! ## Overview
//!
//! Two decisions per frame:
//!
//! 1. **Which body side is primary** - the side whose ear the pose source
//!    sees better is the one worth measuring. The choice is debounced: ear
//!    visibility flickers frame to frame, and flipping the analyzed side
//!    with it would flip the neck measurement too. The winner is only
//!    re-evaluated once the stability counter reaches its cap.
//!
//! 2. **Whether the frame is trustworthy** - visibility floors per joint
//!    group, checked in ascending-override priority: a later failing check
//!    replaces the earlier classification, because it invalidates more of
//!    the geometry.
//!
//! Frames classified anything but [`PlacementQuality::Good`] are *not
//! measured*: they never enter history, and the UI gets repositioning
//! guidance instead. They do not count as good or bad posture.

use crate::{
    constants::placement::{
        EAR_VISIBILITY_FLOOR, HIP_VISIBILITY_FLOOR, SHOULDER_VISIBILITY_FLOOR,
        SIDE_DEBOUNCE_FRAMES,
    },
    keypoints::{Joint, KeypointFrame, Side},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Trustworthiness classification of the current camera framing
///
/// Failure variants name the joint group that broke the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PlacementQuality {
    /// Frame is trustworthy; sample may enter history
    Good,
    /// Primary ear not confidently visible
    Ear,
    /// Neither hip confidently visible
    Hip,
    /// A shoulder not confidently visible
    Shoulder,
}

impl PlacementQuality {
    /// Repositioning guidance for the UI; `None` when the frame is good
    pub const fn guidance(&self) -> Option<&'static str> {
        match self {
            PlacementQuality::Good => None,
            PlacementQuality::Ear => Some("Turn the camera toward your face"),
            PlacementQuality::Hip => Some("Move the camera back to include your hips"),
            PlacementQuality::Shoulder => Some("Keep both shoulders in frame"),
        }
    }
}

/// Decides the primary body side and classifies frame trustworthiness
///
/// Owns all side-selection state; nothing else mutates it.
#[derive(Debug, Clone)]
pub struct PlacementValidator {
    ear_floor: f32,
    hip_floor: f32,
    shoulder_floor: f32,
    debounce_frames: u32,

    primary: Option<Side>,
    stability_counter: u32,
}

impl Default for PlacementValidator {
    fn default() -> Self {
        Self::new(
            EAR_VISIBILITY_FLOOR,
            HIP_VISIBILITY_FLOOR,
            SHOULDER_VISIBILITY_FLOOR,
            SIDE_DEBOUNCE_FRAMES,
        )
    }
}

impl PlacementValidator {
    /// Create a validator with custom floors and debounce
    pub fn new(ear_floor: f32, hip_floor: f32, shoulder_floor: f32, debounce_frames: u32) -> Self {
        Self {
            ear_floor,
            hip_floor,
            shoulder_floor,
            // A zero cap would re-evaluate every frame, defeating the point
            debounce_frames: debounce_frames.max(1),
            primary: None,
            stability_counter: 0,
        }
    }

    /// Side currently trusted for ear/hip measurements
    ///
    /// Left until the first frame has been seen, matching the pose source's
    /// own default.
    pub fn primary_side(&self) -> Side {
        self.primary.unwrap_or(Side::Left)
    }

    /// Update side selection and classify this frame's placement
    pub fn assess(&mut self, frame: &KeypointFrame) -> PlacementQuality {
        self.update_primary_side(frame);
        self.classify(frame)
    }

    /// Debounced primary-side selection
    ///
    /// The counter increments once per frame, saturating at the cap; the
    /// winning side is only re-evaluated when the cap is reached (or no side
    /// has been chosen yet), then the counter restarts. A single-frame
    /// visibility flip can therefore never move the primary side.
    fn update_primary_side(&mut self, frame: &KeypointFrame) {
        let l_vis = frame.visibility(Joint::LEar);
        let r_vis = frame.visibility(Joint::REar);
        let winner = if l_vis >= r_vis { Side::Left } else { Side::Right };

        match self.primary {
            None => {
                self.primary = Some(winner);
                self.stability_counter = 0;
            }
            Some(current) => {
                if self.stability_counter >= self.debounce_frames {
                    if winner != current {
                        #[cfg(feature = "log")]
                        log::debug!("primary side flipped to {:?}", winner);
                        self.primary = Some(winner);
                    }
                    self.stability_counter = 0;
                } else {
                    self.stability_counter += 1;
                }
            }
        }
    }

    /// Placement-quality classification, ascending-override priority
    fn classify(&self, frame: &KeypointFrame) -> PlacementQuality {
        let mut quality = PlacementQuality::Good;

        if below_floor(frame.visibility(self.primary_side().ear()), self.ear_floor) {
            quality = PlacementQuality::Ear;
        }

        let best_hip =
            frame.visibility(Joint::LHip).max(frame.visibility(Joint::RHip));
        if below_floor(best_hip, self.hip_floor) {
            quality = PlacementQuality::Hip;
        }

        let worst_shoulder =
            frame.visibility(Joint::LShoulder).min(frame.visibility(Joint::RShoulder));
        if below_floor(worst_shoulder, self.shoulder_floor) {
            quality = PlacementQuality::Shoulder;
        }

        quality
    }
}

/// A visibility fails its floor when below it or not a finite number
fn below_floor(visibility: f32, floor: f32) -> bool {
    !visibility.is_finite() || visibility < floor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypoints::Keypoint;

    /// Frame with uniform joint visibilities, left ear favored by `l_ear`.
    fn frame_with_vis(
        l_ear: f32,
        r_ear: f32,
        hips: f32,
        shoulders: f32,
    ) -> KeypointFrame {
        KeypointFrame::default()
            .with(Joint::LShoulder, Keypoint::new(300, 300, shoulders))
            .with(Joint::RShoulder, Keypoint::new(380, 300, shoulders))
            .with(Joint::LEar, Keypoint::new(300, 200, l_ear))
            .with(Joint::REar, Keypoint::new(380, 200, r_ear))
            .with(Joint::LHip, Keypoint::new(300, 500, hips))
            .with(Joint::RHip, Keypoint::new(380, 500, hips))
    }

    #[test]
    fn fully_visible_frame_is_good() {
        let mut validator = PlacementValidator::default();
        let quality = validator.assess(&frame_with_vis(0.99, 0.95, 0.9, 0.99));
        assert_eq!(quality, PlacementQuality::Good);
        assert_eq!(validator.primary_side(), Side::Left);
    }

    #[test]
    fn faint_primary_ear_flags_ear() {
        let mut validator = PlacementValidator::default();
        let quality = validator.assess(&frame_with_vis(0.85, 0.5, 0.9, 0.99));
        assert_eq!(quality, PlacementQuality::Ear);
    }

    #[test]
    fn hip_failure_overrides_ear_failure() {
        let mut validator = PlacementValidator::default();
        let quality = validator.assess(&frame_with_vis(0.5, 0.4, 0.5, 0.99));
        assert_eq!(quality, PlacementQuality::Hip);
    }

    #[test]
    fn shoulder_failure_overrides_everything() {
        let mut validator = PlacementValidator::default();
        // Ear, hip, and shoulder floors all violated at once
        let quality = validator.assess(&frame_with_vis(0.5, 0.4, 0.5, 0.6));
        assert_eq!(quality, PlacementQuality::Shoulder);
    }

    #[test]
    fn missing_joints_count_as_invisible() {
        let mut validator = PlacementValidator::default();
        let quality = validator.assess(&KeypointFrame::default());
        assert_eq!(quality, PlacementQuality::Shoulder);
    }

    #[test]
    fn single_frame_flip_does_not_move_primary_side() {
        let mut validator = PlacementValidator::default();

        validator.assess(&frame_with_vis(0.99, 0.5, 0.9, 0.99));
        assert_eq!(validator.primary_side(), Side::Left);

        // One frame where the right ear wins: ignored mid-debounce
        validator.assess(&frame_with_vis(0.5, 0.99, 0.9, 0.99));
        assert_eq!(validator.primary_side(), Side::Left);

        validator.assess(&frame_with_vis(0.99, 0.5, 0.9, 0.99));
        assert_eq!(validator.primary_side(), Side::Left);
    }

    #[test]
    fn sustained_flip_takes_effect_at_the_cap() {
        let mut validator = PlacementValidator::new(0.9, 0.75, 0.93, 10);

        validator.assess(&frame_with_vis(0.99, 0.5, 0.9, 0.99));
        assert_eq!(validator.primary_side(), Side::Left);

        // Right ear wins every frame; the flip lands once the counter caps
        for _ in 0..=10 {
            validator.assess(&frame_with_vis(0.5, 0.99, 0.9, 0.99));
        }
        assert_eq!(validator.primary_side(), Side::Right);
    }

    #[test]
    fn guidance_only_for_bad_placement() {
        assert!(PlacementQuality::Good.guidance().is_none());
        assert!(PlacementQuality::Ear.guidance().is_some());
        assert!(PlacementQuality::Shoulder.guidance().is_some());
    }
}
