//! Score Calibration via Piecewise-Linear Curves
//!
//! ## Overview
//!
//! Raw geometric metrics (degrees, pixels) mean nothing to a user; a 0–100
//! score does. Each component carries its own calibration curve: an ordered
//! list of `(breakpoint, score)` pairs, linearly interpolated between
//! breakpoints and clamped flat outside them.
//!
//! Curves are configuration data - loaded once, hot-swappable - so the
//! mapper validates defensively at load time (sorted, finite, no duplicate
//! breakpoints) and the scoring function itself is pure and total.
//!
//! ## Example
//!
//! ```
//! use posturekit_core::score::ScoreCurve;
//!
//! let curve = ScoreCurve::new(&[(0.0, 100.0), (20.0, 75.0), (40.0, 10.0), (50.0, 0.0)]).unwrap();
//! assert_eq!(curve.score(10.0), 87.5);  // interpolated
//! assert_eq!(curve.score(-5.0), 100.0); // clamped low
//! assert_eq!(curve.score(100.0), 0.0);  // clamped high
//! ```

use heapless::Vec;

use crate::{
    errors::{PostureError, PostureResult},
    keypoints::ComponentScores,
    metrics::RawMetrics,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum breakpoints per curve
///
/// The reference calibrations use 3–4 points; 8 leaves room without
/// unbounding the type.
pub const MAX_CURVE_POINTS: usize = 8;

/// One calibration breakpoint
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurvePoint {
    /// Raw metric value at which this score applies exactly
    pub breakpoint: f32,
    /// Calibrated score at the breakpoint
    pub score: f32,
}

/// A piecewise-linear calibration curve
///
/// Invariant: points are sorted by breakpoint, strictly increasing, all
/// finite. Enforced at construction and deserialization.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "Vec<CurvePoint, MAX_CURVE_POINTS>",
        into = "Vec<CurvePoint, MAX_CURVE_POINTS>"
    )
)]
pub struct ScoreCurve {
    points: Vec<CurvePoint, MAX_CURVE_POINTS>,
}

impl ScoreCurve {
    /// Build a curve from `(breakpoint, score)` pairs
    ///
    /// Pairs are re-sorted by breakpoint defensively; empty input,
    /// non-finite values, and duplicate breakpoints are rejected.
    pub fn new(pairs: &[(f32, f32)]) -> PostureResult<Self> {
        let mut points: Vec<CurvePoint, MAX_CURVE_POINTS> = Vec::new();
        for &(breakpoint, score) in pairs {
            points
                .push(CurvePoint { breakpoint, score })
                .map_err(|_| PostureError::InvalidCurve { reason: "too many points" })?;
        }
        Self::from_points(points)
    }

    fn from_points(mut points: Vec<CurvePoint, MAX_CURVE_POINTS>) -> PostureResult<Self> {
        if points.is_empty() {
            return Err(PostureError::InvalidCurve { reason: "empty curve" });
        }
        if points.iter().any(|p| !p.breakpoint.is_finite() || !p.score.is_finite()) {
            return Err(PostureError::InvalidCurve { reason: "non-finite point" });
        }

        points.sort_unstable_by(|a, b| {
            a.breakpoint.partial_cmp(&b.breakpoint).unwrap_or(core::cmp::Ordering::Equal)
        });

        if points.windows(2).any(|w| w[0].breakpoint == w[1].breakpoint) {
            return Err(PostureError::InvalidCurve { reason: "duplicate breakpoint" });
        }

        Ok(Self { points })
    }

    /// Map a raw metric value to its calibrated score
    ///
    /// Clamped flat at both ends; linear between bracketing breakpoints.
    pub fn score(&self, x: f32) -> f32 {
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];

        if x <= first.breakpoint {
            return first.score;
        }
        if x >= last.breakpoint {
            return last.score;
        }

        for pair in self.points.windows(2) {
            let (p0, p1) = (pair[0], pair[1]);
            if x <= p1.breakpoint {
                let t = (x - p0.breakpoint) / (p1.breakpoint - p0.breakpoint);
                return p0.score + t * (p1.score - p0.score);
            }
        }

        // x < last.breakpoint, so a bracketing pair always matched
        last.score
    }

    /// The curve's breakpoints, sorted ascending
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }
}

impl TryFrom<Vec<CurvePoint, MAX_CURVE_POINTS>> for ScoreCurve {
    type Error = PostureError;

    fn try_from(points: Vec<CurvePoint, MAX_CURVE_POINTS>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

impl From<ScoreCurve> for Vec<CurvePoint, MAX_CURVE_POINTS> {
    fn from(curve: ScoreCurve) -> Self {
        curve.points
    }
}

/// The per-component calibration set
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CurveSet {
    /// Curve applied to |relative neck angle| (degrees)
    pub neck: ScoreCurve,
    /// Curve applied to |torso angle| (degrees)
    pub torso: ScoreCurve,
    /// Curve applied to the raw shoulder offset (pixels)
    pub shoulders: ScoreCurve,
}

impl CurveSet {
    /// Score one frame's raw metrics
    pub fn score(&self, metrics: &RawMetrics) -> ComponentScores {
        ComponentScores {
            neck: self.neck.score(libm::fabsf(metrics.relative_neck_angle)),
            torso: self.torso.score(metrics.torso_angle.unsigned_abs() as f32),
            shoulders: self.shoulders.score(metrics.shoulder_offset),
        }
    }
}

impl Default for CurveSet {
    fn default() -> Self {
        // Reference calibrations; invariants hold by construction
        Self {
            neck: ScoreCurve::new(&[(0.0, 100.0), (25.0, 75.0), (40.0, 20.0), (50.0, 0.0)])
                .expect("default neck curve is valid"),
            torso: ScoreCurve::new(&[(0.0, 100.0), (15.0, 75.0), (30.0, 10.0), (40.0, 0.0)])
                .expect("default torso curve is valid"),
            shoulders: ScoreCurve::new(&[(0.0, 100.0), (100.0, 50.0), (200.0, 0.0)])
                .expect("default shoulders curve is valid"),
        }
    }
}
