//! Time-Bounded Sample Windows for Score Aggregation
//!
//! ## Overview
//!
//! Alerting and telemetry both run on *averages*, not instantaneous frames,
//! but over different horizons: telemetry reports the last ~30 s, alerts
//! judge the last ~120 s. Each horizon is its own [`HistoryWindow`] - an
//! ordered sequence of admissible samples with a max age, evicted from the
//! front before every read so the invariant
//! `now - oldest.timestamp <= max_age` holds at read time.
//!
//! ## Memory model
//!
//! Windows have fixed capacity (const generic), like the rest of the hot
//! path: no allocation per frame. Capacity is sized for the nominal frame
//! rate times the window duration with headroom - 30 fps × 30 s = 900
//! samples fits in 1024, 30 fps × 120 s = 3600 fits in 4096. If a deployment
//! overruns the capacity anyway, the oldest sample is dropped: recent data
//! is worth more than old data, and time-based eviction would discard it
//! first regardless.
//!
//! ## Admission
//!
//! Only samples whose placement classified [`PlacementQuality::Good`] are
//! recorded, to both windows. The single-threaded frame loop guarantees
//! non-decreasing timestamps.

use crate::{
    keypoints::{BodyComponent, ComponentScores, Sample},
    placement::PlacementQuality,
    time::{elapsed_ms, Timestamp},
};

use heapless::Deque;

/// Default short (telemetry) window capacity
pub const SHORT_WINDOW_CAPACITY: usize = 1024;

/// Default long (alert) window capacity
pub const LONG_WINDOW_CAPACITY: usize = 4096;

/// One time-bounded window of samples, ordered by timestamp ascending
#[derive(Debug)]
pub struct HistoryWindow<const N: usize> {
    samples: Deque<Sample, N>,
    max_age_ms: u64,
}

impl<const N: usize> HistoryWindow<N> {
    /// Create an empty window with the given max age
    pub const fn new(max_age_ms: u64) -> Self {
        Self { samples: Deque::new(), max_age_ms }
    }

    /// Window max age in milliseconds
    pub fn max_age_ms(&self) -> u64 {
        self.max_age_ms
    }

    /// Append a sample, dropping the oldest if at capacity
    pub fn push(&mut self, sample: Sample) {
        if self.samples.is_full() {
            self.samples.pop_front();
            #[cfg(feature = "log")]
            log::warn!(
                "history window at capacity {} before max-age eviction; dropping oldest",
                N
            );
        }
        // Cannot fail: a slot was just freed if needed
        let _ = self.samples.push_back(sample);
    }

    /// Evict samples older than the max age, from the front
    pub fn evict(&mut self, now: Timestamp) {
        while let Some(front) = self.samples.front() {
            if elapsed_ms(front.timestamp, now) > self.max_age_ms {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Mean of one component's score across the window
    ///
    /// Returns 0.0 for an empty window: an explicit "no data" sentinel the
    /// callers treat as such, not an error.
    pub fn average(&self, component: BodyComponent) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.samples.iter().map(|s| s.scores.get(component)).sum();
        sum / self.samples.len() as f32
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Owns both history windows and enforces the admission rule
///
/// The two windows share admission but have independent lifecycles: a
/// sample lives in both until each window's own max age evicts it.
#[derive(Debug)]
pub struct HistoryAggregator<const S: usize = SHORT_WINDOW_CAPACITY, const L: usize = LONG_WINDOW_CAPACITY>
{
    short: HistoryWindow<S>,
    long: HistoryWindow<L>,
}

impl<const S: usize, const L: usize> HistoryAggregator<S, L> {
    /// Create an aggregator with the given window max ages
    pub const fn new(short_max_age_ms: u64, long_max_age_ms: u64) -> Self {
        Self {
            short: HistoryWindow::new(short_max_age_ms),
            long: HistoryWindow::new(long_max_age_ms),
        }
    }

    /// Record a sample in both windows, if admissible
    ///
    /// Only `Good`-placement samples are measured; anything else is silently
    /// skipped (it is guidance, not data).
    pub fn record(&mut self, sample: Sample) {
        if sample.placement != PlacementQuality::Good {
            return;
        }
        self.short.push(sample);
        self.long.push(sample);
    }

    /// Per-component averages over the short (telemetry) window
    ///
    /// Evicts stale samples first.
    pub fn short_averages(&mut self, now: Timestamp) -> ComponentScores {
        self.short.evict(now);
        averages_of(&self.short)
    }

    /// Per-component averages over the long (alert) window
    ///
    /// Evicts stale samples first.
    pub fn long_averages(&mut self, now: Timestamp) -> ComponentScores {
        self.long.evict(now);
        averages_of(&self.long)
    }

    /// Sample counts (short, long), for diagnostics
    pub fn depths(&self) -> (usize, usize) {
        (self.short.len(), self.long.len())
    }
}

fn averages_of<const N: usize>(window: &HistoryWindow<N>) -> ComponentScores {
    ComponentScores {
        neck: window.average(BodyComponent::Neck),
        torso: window.average(BodyComponent::Torso),
        shoulders: window.average(BodyComponent::Shoulders),
    }
}
