//! Rate-Limited Telemetry Snapshots
//!
//! The scheduler decides *when* a snapshot of the short-window averages goes
//! out; the transport lives with the connectors. Emission is interval-based
//! on the wall clock, independent of the alert cooldown, and always reads
//! the short window regardless of which window alerting evaluates.
//!
//! Send failures are the transport's problem: the scheduler marks an
//! interval consumed when it emits, so a failed send is simply retried at
//! the next interval - the interval itself throttles retries.

use crate::{
    keypoints::{BodyComponent, ComponentScores},
    time::{elapsed_ms, Timestamp},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One component's averaged score, as handed to the telemetry collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComponentReading {
    /// Component wire name
    pub component_type: BodyComponent,
    /// Rounded average score, 0–100
    pub score: u8,
}

/// Decides when telemetry snapshots are emitted
#[derive(Debug, Clone)]
pub struct TelemetryScheduler {
    interval_ms: u64,
    last_sent: Option<Timestamp>,
}

impl TelemetryScheduler {
    /// Create a scheduler with the given emission interval
    pub const fn new(interval_ms: u64) -> Self {
        Self { interval_ms, last_sent: None }
    }

    /// Whether an emission is due at `now`
    ///
    /// Due immediately on the first call: the backend learns about a fresh
    /// session without waiting a full interval.
    pub fn due(&self, now: Timestamp) -> bool {
        match self.last_sent {
            None => true,
            Some(last) => elapsed_ms(last, now) >= self.interval_ms,
        }
    }

    /// Build a snapshot from the short-window averages and consume the
    /// interval; `None` when not yet due
    pub fn poll(
        &mut self,
        now: Timestamp,
        short_averages: &ComponentScores,
    ) -> Option<[ComponentReading; 3]> {
        if !self.due(now) {
            return None;
        }
        self.last_sent = Some(now);
        Some(snapshot(short_averages))
    }
}

/// Round per-component averages into wire readings
pub fn snapshot(averages: &ComponentScores) -> [ComponentReading; 3] {
    BodyComponent::ALL.map(|component| ComponentReading {
        component_type: component,
        score: libm::roundf(averages.get(component).clamp(0.0, 100.0)) as u8,
    })
}
