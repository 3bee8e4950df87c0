//! Keypoint Types for the Posture Pipeline
//!
//! ## Overview
//!
//! This module defines the data that flows into and out of the pipeline:
//! named body joints with pixel coordinates and a visibility confidence, the
//! per-frame container the pose source produces, and the typed per-component
//! score record the rest of the system consumes.
//!
//! ## Design Notes
//!
//! The pose source is an external collaborator; frames arrive as a mapping
//! from joint name to `{x, y, visibility}` where any entry may be absent
//! (occlusion, subject partially out of frame). The container models that
//! directly with `Option<Keypoint>` per joint rather than a map keyed by
//! strings - lookups are exhaustive matches the compiler checks, and a typo
//! cannot silently produce a default value.
//!
//! A missing `visibility` field deserializes to 0.0 ("not visible"). That is
//! a documented fallback, never an error: placement classification treats
//! zero-visibility joints as untrustworthy and routes the frame to guidance.

use crate::time::Timestamp;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Named body joints delivered by the pose source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Joint {
    /// Left shoulder
    LShoulder = 0,
    /// Right shoulder
    RShoulder = 1,
    /// Left ear
    LEar = 2,
    /// Right ear
    REar = 3,
    /// Left hip
    LHip = 4,
    /// Right hip
    RHip = 5,
}

impl Joint {
    /// Wire name used by the pose source and in logs
    pub const fn name(&self) -> &'static str {
        match self {
            Joint::LShoulder => "l_shoulder",
            Joint::RShoulder => "r_shoulder",
            Joint::LEar => "l_ear",
            Joint::REar => "r_ear",
            Joint::LHip => "l_hip",
            Joint::RHip => "r_hip",
        }
    }
}

/// Body side, used for primary-side selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    /// User's left
    Left,
    /// User's right
    Right,
}

impl Side {
    /// The ear joint on this side
    pub const fn ear(&self) -> Joint {
        match self {
            Side::Left => Joint::LEar,
            Side::Right => Joint::REar,
        }
    }

    /// The hip joint on this side
    pub const fn hip(&self) -> Joint {
        match self {
            Side::Left => Joint::LHip,
            Side::Right => Joint::RHip,
        }
    }

    /// The shoulder joint on this side
    pub const fn shoulder(&self) -> Joint {
        match self {
            Side::Left => Joint::LShoulder,
            Side::Right => Joint::RShoulder,
        }
    }

    /// The other side
    pub const fn opposite(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Scored body components
///
/// A fixed enumerated set with a typed record per component
/// ([`ComponentScores`]), replacing stringly-keyed score dictionaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum BodyComponent {
    /// Ear-to-shoulder segment
    Neck = 0,
    /// Shoulder-to-hip segment
    Torso = 1,
    /// Left/right shoulder span (depth/rotation proxy)
    Shoulders = 2,
}

impl BodyComponent {
    /// All components, in evaluation order
    pub const ALL: [BodyComponent; 3] =
        [BodyComponent::Neck, BodyComponent::Torso, BodyComponent::Shoulders];

    /// Wire name used in telemetry payloads
    pub const fn name(&self) -> &'static str {
        match self {
            BodyComponent::Neck => "neck",
            BodyComponent::Torso => "torso",
            BodyComponent::Shoulders => "shoulders",
        }
    }
}

/// A single measured joint: pixel coordinates plus visibility confidence
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Keypoint {
    /// Horizontal pixel coordinate (image space, origin top-left)
    pub x: i32,
    /// Vertical pixel coordinate (grows downward)
    pub y: i32,
    /// Visibility confidence in [0, 1]; absent on the wire means 0.0
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: f32,
}

impl Keypoint {
    /// Construct a keypoint
    pub const fn new(x: i32, y: i32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }
}

/// One frame of keypoints from the pose source
///
/// Produced once per input frame and consumed immediately; never persisted.
/// Any joint may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeypointFrame {
    /// Left shoulder, if detected
    pub l_shoulder: Option<Keypoint>,
    /// Right shoulder, if detected
    pub r_shoulder: Option<Keypoint>,
    /// Left ear, if detected
    pub l_ear: Option<Keypoint>,
    /// Right ear, if detected
    pub r_ear: Option<Keypoint>,
    /// Left hip, if detected
    pub l_hip: Option<Keypoint>,
    /// Right hip, if detected
    pub r_hip: Option<Keypoint>,
}

impl KeypointFrame {
    /// Look up a joint by name
    pub fn get(&self, joint: Joint) -> Option<Keypoint> {
        match joint {
            Joint::LShoulder => self.l_shoulder,
            Joint::RShoulder => self.r_shoulder,
            Joint::LEar => self.l_ear,
            Joint::REar => self.r_ear,
            Joint::LHip => self.l_hip,
            Joint::RHip => self.r_hip,
        }
    }

    /// Visibility of a joint; 0.0 when the joint is absent
    pub fn visibility(&self, joint: Joint) -> f32 {
        self.get(joint).map(|kp| kp.visibility).unwrap_or(0.0)
    }

    /// Set a joint (builder-style, used heavily by tests)
    pub fn with(mut self, joint: Joint, kp: Keypoint) -> Self {
        match joint {
            Joint::LShoulder => self.l_shoulder = Some(kp),
            Joint::RShoulder => self.r_shoulder = Some(kp),
            Joint::LEar => self.l_ear = Some(kp),
            Joint::REar => self.r_ear = Some(kp),
            Joint::LHip => self.l_hip = Some(kp),
            Joint::RHip => self.r_hip = Some(kp),
        }
        self
    }
}

/// Calibrated scores for all components, 0–100 per component
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentScores {
    /// Neck score
    pub neck: f32,
    /// Torso score
    pub torso: f32,
    /// Shoulders score
    pub shoulders: f32,
}

impl ComponentScores {
    /// Score for one component
    pub fn get(&self, component: BodyComponent) -> f32 {
        match component {
            BodyComponent::Neck => self.neck,
            BodyComponent::Torso => self.torso,
            BodyComponent::Shoulders => self.shoulders,
        }
    }

    /// Worst component score
    pub fn min(&self) -> f32 {
        self.neck.min(self.torso).min(self.shoulders)
    }
}

/// A scored, admissible observation owned by the history aggregator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// When the frame was observed
    pub timestamp: Timestamp,
    /// Calibrated per-component scores
    pub scores: ComponentScores,
    /// Placement classification at observation time
    pub placement: crate::placement::PlacementQuality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_joint_has_zero_visibility() {
        let frame = KeypointFrame::default();
        assert_eq!(frame.visibility(Joint::LEar), 0.0);
        assert!(frame.get(Joint::LEar).is_none());
    }

    #[test]
    fn side_joint_mapping() {
        assert_eq!(Side::Left.ear(), Joint::LEar);
        assert_eq!(Side::Right.hip(), Joint::RHip);
        assert_eq!(Side::Left.opposite(), Side::Right);
    }

    #[test]
    fn component_names_match_wire_format() {
        assert_eq!(BodyComponent::Neck.name(), "neck");
        assert_eq!(BodyComponent::Shoulders.name(), "shoulders");
    }

    #[test]
    fn worst_score() {
        let scores = ComponentScores { neck: 90.0, torso: 40.0, shoulders: 75.0 };
        assert_eq!(scores.min(), 40.0);
        assert_eq!(scores.get(BodyComponent::Torso), 40.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn frame_deserializes_with_missing_fields() {
        let json = r#"{"l_shoulder": {"x": 10, "y": 20, "visibility": 0.99},
                       "r_shoulder": {"x": 90, "y": 21}}"#;
        let frame: KeypointFrame = serde_json::from_str(json).unwrap();
        assert_eq!(frame.l_shoulder.unwrap().visibility, 0.99);
        // Missing visibility defaults to "not visible", missing joints to None
        assert_eq!(frame.r_shoulder.unwrap().visibility, 0.0);
        assert!(frame.l_ear.is_none());
    }
}
