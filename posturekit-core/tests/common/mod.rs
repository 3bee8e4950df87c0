//! Common test utilities and frame generators for integration tests
//!
//! Builds synthetic keypoint frames with controlled geometry: callers name
//! the neck/torso inclinations and shoulder span they want, and get a frame
//! whose extracted metrics land on those values (within integer-degree
//! truncation).

#![allow(dead_code)]

use posturekit_core::keypoints::{Joint, Keypoint, KeypointFrame};

/// Left-shoulder anchor for all generated frames
const ANCHOR_X: i32 = 300;
const ANCHOR_Y: i32 = 300;

/// Ear-to-shoulder segment length in pixels
const NECK_LEN: f32 = 100.0;

/// Shoulder-to-hip segment length in pixels
const TORSO_LEN: f32 = 200.0;

/// Per-joint visibilities for a generated frame
#[derive(Debug, Clone, Copy)]
pub struct Visibility {
    pub ears: f32,
    pub hips: f32,
    pub shoulders: f32,
}

impl Default for Visibility {
    fn default() -> Self {
        Self { ears: 0.99, hips: 0.95, shoulders: 0.99 }
    }
}

/// Build a frame whose neck/torso angles and shoulder offset extract to the
/// requested values
///
/// Angles are in degrees from vertical, positive to the subject's image
/// right. The ear sits `NECK_LEN` pixels from the left shoulder along the
/// neck direction; the hip sits `TORSO_LEN` pixels below along the torso
/// direction.
pub fn frame_with(neck_deg: f32, torso_deg: f32, shoulder_offset: i32, vis: Visibility) -> KeypointFrame {
    let (neck_sin, neck_cos) = neck_deg.to_radians().sin_cos();
    let (torso_sin, torso_cos) = torso_deg.to_radians().sin_cos();

    let l_shoulder = Keypoint::new(ANCHOR_X, ANCHOR_Y, vis.shoulders);
    let r_shoulder = Keypoint::new(ANCHOR_X + shoulder_offset, ANCHOR_Y, vis.shoulders);

    let ear = |sx: i32| {
        Keypoint::new(
            sx + (neck_sin * NECK_LEN).round() as i32,
            ANCHOR_Y - (neck_cos * NECK_LEN).round() as i32,
            vis.ears,
        )
    };

    // Hip placed so the hip-to-shoulder segment leans by torso_deg
    let hip = |sx: i32| {
        Keypoint::new(
            sx - (torso_sin * TORSO_LEN).round() as i32,
            ANCHOR_Y + (torso_cos * TORSO_LEN).round() as i32,
            vis.hips,
        )
    };

    KeypointFrame::default()
        .with(Joint::LShoulder, l_shoulder)
        .with(Joint::RShoulder, r_shoulder)
        .with(Joint::LEar, ear(ANCHOR_X))
        .with(Joint::REar, ear(ANCHOR_X + shoulder_offset))
        .with(Joint::LHip, hip(ANCHOR_X))
        .with(Joint::RHip, hip(ANCHOR_X + shoulder_offset))
}

/// Frame timestamps paced at a fixed frame rate
pub struct FramePacer {
    fps: u32,
    frame: u64,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        Self { fps, frame: 0 }
    }

    /// Timestamp of the next frame, in milliseconds from t=0
    pub fn tick(&mut self) -> u64 {
        let ts = self.frame * 1000 / self.fps as u64;
        self.frame += 1;
        ts
    }
}
