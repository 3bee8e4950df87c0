//! Cooldown-Gated Alert Decisions
//!
//! ## Overview
//!
//! The coordinator is a two-state machine over `{Idle, CoolingDown}`. A
//! successful trigger moves it to `CoolingDown`; it returns to `Idle` purely
//! by elapsed time, checked lazily on each evaluation - there is no
//! "cooldown expired" event.
//!
//! Evaluation runs only on frames whose instantaneous posture is bad (some
//! component's score under the sensitivity threshold). It then judges the
//! *long-window averages*: an alert means "this has been bad for a while",
//! not "this frame looked bad".
//!
//! ## Shared cooldown
//!
//! The cooldown timer is shared across components: while the neck alert's
//! cooldown runs, a newly-bad torso stays silent too. This suppresses alert
//! bursts under simultaneous multi-component violations and matches the
//! reference behavior; per-component timers would change alert frequency
//! materially (see DESIGN.md).

use heapless::Vec;

use crate::{
    config::Settings,
    keypoints::{BodyComponent, ComponentScores},
    time::{elapsed_ms, Timestamp},
};

/// Coordinator phase, derived lazily from the last trigger time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertPhase {
    /// Free to trigger
    Idle,
    /// A recent trigger's cooldown is still running
    CoolingDown,
}

/// One alert decision: which component, what to tell the user, how hard to
/// buzz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alert {
    /// Component whose sustained average crossed the threshold
    pub component: BodyComponent,
    /// Guidance string for the UI
    pub message: &'static str,
    /// Actuator intensity, 0–100
    pub intensity: u8,
}

/// Decides when the actuator fires
///
/// Owns the last-trigger timestamp exclusively; mutated only on a
/// successful trigger.
#[derive(Debug, Clone)]
pub struct AlertCoordinator {
    cooldown_ms: u64,
    last_alert: Option<Timestamp>,
}

impl AlertCoordinator {
    /// Create a coordinator with the given cooldown
    pub const fn new(cooldown_ms: u64) -> Self {
        Self { cooldown_ms, last_alert: None }
    }

    /// Current phase at `now`
    pub fn phase(&self, now: Timestamp) -> AlertPhase {
        match self.last_alert {
            Some(last) if elapsed_ms(last, now) <= self.cooldown_ms => AlertPhase::CoolingDown,
            _ => AlertPhase::Idle,
        }
    }

    /// Evaluate one bad frame against the long-window averages
    ///
    /// Callers invoke this only when the instantaneous posture is bad; the
    /// guard is still enforced here so a stray call cannot fire early. At
    /// most one alert per call escapes the shared cooldown: triggering for
    /// the first violating component starts the cooldown that silences the
    /// rest.
    pub fn evaluate(
        &mut self,
        now: Timestamp,
        instantaneous: &ComponentScores,
        long_averages: &ComponentScores,
        settings: &Settings,
        head_tilted_back: bool,
    ) -> Vec<Alert, 3> {
        let mut alerts = Vec::new();

        let sensitivity = settings.sensitivity as f32;
        if instantaneous.min() >= sensitivity {
            return alerts;
        }

        for component in BodyComponent::ALL {
            if long_averages.get(component) >= sensitivity {
                continue;
            }
            if self.phase(now) == AlertPhase::CoolingDown {
                continue;
            }

            let _ = alerts.push(Alert {
                component,
                message: guidance(component, head_tilted_back),
                intensity: settings.vibration_intensity,
            });
            self.last_alert = Some(now);
        }

        alerts
    }
}

/// Guidance string for a violation of one component
///
/// The neck message depends on posture context: a head tilted back wants
/// realignment with the torso, not straightening.
pub fn guidance(component: BodyComponent, head_tilted_back: bool) -> &'static str {
    match component {
        BodyComponent::Neck if head_tilted_back => "Align your neck with your torso",
        BodyComponent::Neck => "Straighten your neck",
        BodyComponent::Torso => "Sit upright",
        BodyComponent::Shoulders => "Face the desk/screen",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COOLDOWN_MS: u64 = 300_000;

    fn all(score: f32) -> ComponentScores {
        ComponentScores { neck: score, torso: score, shoulders: score }
    }

    fn settings() -> Settings {
        Settings { sensitivity: 75, vibration_intensity: 80, has_active_session: true }
    }

    #[test]
    fn good_frame_never_alerts() {
        let mut coordinator = AlertCoordinator::new(COOLDOWN_MS);
        let alerts = coordinator.evaluate(1000, &all(90.0), &all(10.0), &settings(), false);
        assert!(alerts.is_empty());
        assert_eq!(coordinator.phase(1000), AlertPhase::Idle);
    }

    #[test]
    fn sustained_violation_alerts_once_per_cooldown() {
        let mut coordinator = AlertCoordinator::new(COOLDOWN_MS);

        let first = coordinator.evaluate(1000, &all(40.0), &all(40.0), &settings(), false);
        assert_eq!(first.len(), 1);
        assert_eq!(coordinator.phase(1001), AlertPhase::CoolingDown);

        // Second bad evaluation inside the cooldown: silent
        let second = coordinator.evaluate(60_000, &all(40.0), &all(40.0), &settings(), false);
        assert!(second.is_empty());

        // Past the cooldown: fires again
        let third =
            coordinator.evaluate(1000 + COOLDOWN_MS + 1, &all(40.0), &all(40.0), &settings(), false);
        assert_eq!(third.len(), 1);
    }

    #[test]
    fn shared_cooldown_silences_other_components() {
        let mut coordinator = AlertCoordinator::new(COOLDOWN_MS);

        // Every component's average is bad; only the first one fires
        let alerts = coordinator.evaluate(1000, &all(40.0), &all(40.0), &settings(), false);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].component, BodyComponent::Neck);

        // A different component going bad later is still inside the cooldown
        let bad_torso = ComponentScores { neck: 90.0, torso: 40.0, shoulders: 90.0 };
        let later = coordinator.evaluate(5000, &bad_torso, &bad_torso, &settings(), false);
        assert!(later.is_empty());
    }

    #[test]
    fn bad_frame_with_good_average_stays_silent() {
        let mut coordinator = AlertCoordinator::new(COOLDOWN_MS);
        // Instantaneous dip, but the long window still averages fine
        let alerts = coordinator.evaluate(1000, &all(40.0), &all(85.0), &settings(), false);
        assert!(alerts.is_empty());
    }

    #[test]
    fn alert_carries_configured_intensity_and_message() {
        let mut coordinator = AlertCoordinator::new(COOLDOWN_MS);
        let bad_neck = ComponentScores { neck: 40.0, torso: 90.0, shoulders: 90.0 };

        let alerts = coordinator.evaluate(1000, &bad_neck, &bad_neck, &settings(), false);
        assert_eq!(alerts[0].intensity, 80);
        assert_eq!(alerts[0].message, "Straighten your neck");
    }

    #[test]
    fn tilted_back_neck_gets_alignment_guidance() {
        let mut coordinator = AlertCoordinator::new(COOLDOWN_MS);
        let bad_neck = ComponentScores { neck: 40.0, torso: 90.0, shoulders: 90.0 };

        let alerts = coordinator.evaluate(1000, &bad_neck, &bad_neck, &settings(), true);
        assert_eq!(alerts[0].message, "Align your neck with your torso");
    }
}
