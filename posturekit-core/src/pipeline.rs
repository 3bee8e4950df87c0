//! Per-Frame Pipeline Orchestration
//!
//! ## Overview
//!
//! [`PostureMonitor`] owns every stateful pipeline component and runs one
//! frame through all of them:
//!
//! ```text
//! KeypointFrame → PlacementValidator → MetricExtractor → ScoreMapper
//!                        ↓                                    ↓
//!                  admissibility                    HistoryAggregator
//!                                                     ↓          ↓
//!                                            AlertCoordinator  TelemetryScheduler
//! ```
//!
//! The monitor is meant to be owned exclusively by a single frame loop:
//! every mutation happens inside [`PostureMonitor::process_frame`], with the
//! timestamp handed in at the boundary. That keeps sample admission in
//! non-decreasing timestamp order and makes the whole pipeline clock-free
//! and deterministic under test.
//!
//! Settings snapshots are applied between frames via
//! [`PostureMonitor::apply_settings`]; a frame never observes a
//! half-updated configuration.

use heapless::Vec;

use crate::{
    alert::{guidance, Alert, AlertCoordinator},
    config::{PipelineConfig, Settings},
    history::{HistoryAggregator, LONG_WINDOW_CAPACITY, SHORT_WINDOW_CAPACITY},
    keypoints::{BodyComponent, ComponentScores, KeypointFrame, Sample, Side},
    metrics::MetricExtractor,
    placement::{PlacementQuality, PlacementValidator},
    score::CurveSet,
    telemetry::{ComponentReading, TelemetryScheduler},
    time::Timestamp,
};

/// Everything one frame produced, for the UI and the I/O collaborators
#[derive(Debug, Clone)]
pub struct FrameReport {
    /// Whether mandatory joints were present
    pub subject_visible: bool,
    /// Placement classification for this frame
    pub placement: PlacementQuality,
    /// Repositioning guidance when placement is not good
    pub placement_guidance: Option<&'static str>,
    /// Side currently trusted for measurement
    pub primary_side: Side,
    /// Calibrated scores; `None` on a degraded frame
    pub scores: Option<ComponentScores>,
    /// Every component's instantaneous score met the sensitivity threshold
    pub good_posture: bool,
    /// Head leaned back rather than slouched
    pub head_tilted_back: bool,
    /// Per-component guidance for instantaneous violations
    pub issues: Vec<(BodyComponent, &'static str), 3>,
    /// Alert decisions to forward to the actuator
    pub alerts: Vec<Alert, 3>,
    /// Telemetry snapshot, when the emission interval is due
    pub telemetry: Option<[ComponentReading; 3]>,
    /// Seconds of consecutive good posture
    pub good_time_s: f32,
    /// Seconds of consecutive bad posture
    pub bad_time_s: f32,
}

/// The posture signal pipeline, one instance per monitored camera
pub struct PostureMonitor<
    const S: usize = SHORT_WINDOW_CAPACITY,
    const L: usize = LONG_WINDOW_CAPACITY,
> {
    extractor: MetricExtractor,
    curves: CurveSet,
    placement: PlacementValidator,
    history: HistoryAggregator<S, L>,
    alerts: AlertCoordinator,
    telemetry: TelemetryScheduler,
    settings: Settings,
    fps: u32,
    good_streak: u32,
    bad_streak: u32,
}

impl<const S: usize, const L: usize> PostureMonitor<S, L> {
    /// Build a monitor from startup configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            extractor: MetricExtractor::new(
                config.leaning_torso_deg,
                config.neck_alignment_deg,
                config.reclined_torso_deg,
                config.reclined_neck_correction,
            ),
            curves: config.curves,
            placement: PlacementValidator::new(
                config.ear_visibility_floor,
                config.hip_visibility_floor,
                config.shoulder_visibility_floor,
                config.side_debounce_frames,
            ),
            history: HistoryAggregator::new(config.short_window_ms, config.long_window_ms),
            alerts: AlertCoordinator::new(config.alert_cooldown_ms),
            telemetry: TelemetryScheduler::new(config.send_interval_ms),
            settings: Settings::default(),
            fps: config.fps.max(1),
            good_streak: 0,
            bad_streak: 0,
        }
    }

    /// Replace the settings snapshot, effective from the next frame
    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings.clamped();
    }

    /// Current settings snapshot
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Run one frame through the pipeline
    pub fn process_frame(&mut self, frame: &KeypointFrame, now: Timestamp) -> FrameReport {
        let placement = self.placement.assess(frame);
        let primary_side = self.placement.primary_side();

        let metrics = match self.extractor.extract(frame, primary_side) {
            Ok(metrics) => metrics,
            Err(_) => {
                return FrameReport {
                    subject_visible: false,
                    placement,
                    placement_guidance: placement.guidance(),
                    primary_side,
                    scores: None,
                    good_posture: false,
                    head_tilted_back: false,
                    issues: Vec::new(),
                    alerts: Vec::new(),
                    telemetry: None,
                    good_time_s: self.good_time_s(),
                    bad_time_s: self.bad_time_s(),
                };
            }
        };

        let scores = self.curves.score(&metrics);
        let sensitivity = self.settings.sensitivity as f32;
        let good_posture = scores.min() >= sensitivity;

        self.history.record(Sample { timestamp: now, scores, placement });

        if good_posture {
            self.good_streak += 1;
            self.bad_streak = 0;
        } else {
            self.bad_streak += 1;
            self.good_streak = 0;
        }

        let mut issues: Vec<(BodyComponent, &'static str), 3> = Vec::new();
        for component in BodyComponent::ALL {
            if scores.get(component) < sensitivity {
                let _ = issues
                    .push((component, guidance(component, metrics.is_head_tilted_back)));
            }
        }

        // Unmeasured frames (placement not good) carry no admissible sample;
        // judging the long averages on them would read the empty-window
        // sentinel as bad posture while the user adjusts the camera
        let alerts = if good_posture || placement != PlacementQuality::Good {
            Vec::new()
        } else {
            let long_averages = self.history.long_averages(now);
            self.alerts.evaluate(
                now,
                &scores,
                &long_averages,
                &self.settings,
                metrics.is_head_tilted_back,
            )
        };

        let telemetry = if self.telemetry.due(now) {
            let short_averages = self.history.short_averages(now);
            self.telemetry.poll(now, &short_averages)
        } else {
            None
        };

        FrameReport {
            subject_visible: true,
            placement,
            placement_guidance: placement.guidance(),
            primary_side,
            scores: Some(scores),
            good_posture,
            head_tilted_back: metrics.is_head_tilted_back,
            issues,
            alerts,
            telemetry,
            good_time_s: self.good_time_s(),
            bad_time_s: self.bad_time_s(),
        }
    }

    /// Seconds of consecutive good posture at the nominal frame rate
    fn good_time_s(&self) -> f32 {
        self.good_streak as f32 / self.fps as f32
    }

    /// Seconds of consecutive bad posture at the nominal frame rate
    fn bad_time_s(&self) -> f32 {
        self.bad_streak as f32 / self.fps as f32
    }
}
