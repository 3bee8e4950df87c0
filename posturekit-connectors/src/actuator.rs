//! Haptic Actuator Driver with Cancellable Pulse Sequences
//!
//! ## Overview
//!
//! An alert trigger runs a multi-second vibration sequence. Running that on
//! the frame-processing path would stall posture sampling for its whole
//! duration, so the sequence runs on its own task: the frame loop calls
//! [`HapticActuator::trigger`], which is non-blocking and fire-and-forget.
//!
//! ## Safety rule
//!
//! The motor must never be left energized. The pulse task forces the pin
//! off when a pulse completes, when a pulse is cancelled mid-flight, and
//! when the shutdown signal arrives - whichever comes first.
//!
//! ## Pulse shapes
//!
//! - **Long** (alerts): three 1 s-on / 1 s-off PWM cycles; intensity 0–100
//!   maps onto duty cycle 150–255. Below ~150 the motor doesn't reliably
//!   spin up, which is why the range is offset rather than proportional.
//! - **Short** (feedback): two 0.1 s full-power blips, 0.5 s apart.
//!
//! A trigger while a pulse is already running is a no-op, matching the
//! physical intuition: one buzz is one buzz.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::ConnectorError;

/// Duty cycle floor: intensity 0 still has to spin the motor
pub const DUTY_FLOOR: u8 = 150;

/// Duty cycle ceiling at intensity 100
pub const DUTY_CEILING: u8 = 255;

/// Low-level vibration output the pulse runner drives
///
/// Implementations wrap whatever the deployment has - a GPIO PWM pin, a
/// debug logger, a test recorder. A disconnected pin makes every operation
/// a safe no-op at the implementation's discretion.
#[async_trait::async_trait]
pub trait HapticPin: Send + 'static {
    /// Set the PWM duty cycle (0 = off)
    async fn set_duty(&mut self, duty: u8) -> Result<(), ConnectorError>;

    /// Force the output off
    async fn off(&mut self) -> Result<(), ConnectorError>;

    /// Whether the underlying device is reachable
    fn is_connected(&self) -> bool;
}

/// A pulse sequence request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseKind {
    /// Alert pulse: three 1 s-on / 1 s-off cycles at mapped intensity
    Long {
        /// Intensity 0–100
        intensity: u8,
    },
    /// Feedback pulse: two short full-power blips
    Short,
}

/// One step of a pulse plan: duty cycle to apply, then hold time
pub type PulseStep = (u8, Duration);

/// Map alert intensity 0–100 onto the motor's usable duty range
pub fn duty_for_intensity(intensity: u8) -> u8 {
    let intensity = intensity.min(100) as u16;
    let span = (DUTY_CEILING - DUTY_FLOOR) as u16;
    DUTY_FLOOR + (intensity * span / 100) as u8
}

impl PulseKind {
    /// The step sequence this pulse runs
    pub fn plan(&self) -> Vec<PulseStep> {
        match self {
            PulseKind::Long { intensity } => {
                let duty = duty_for_intensity(*intensity);
                let mut steps = Vec::with_capacity(6);
                for _ in 0..3 {
                    steps.push((duty, Duration::from_secs(1)));
                    steps.push((0, Duration::from_secs(1)));
                }
                steps
            }
            PulseKind::Short => vec![
                (DUTY_CEILING, Duration::from_millis(100)),
                (0, Duration::from_millis(500)),
                (DUTY_CEILING, Duration::from_millis(100)),
                (0, Duration::ZERO),
            ],
        }
    }
}

/// Non-blocking handle the frame loop triggers pulses through
#[derive(Clone)]
pub struct HapticActuator {
    tx: mpsc::Sender<PulseKind>,
    running: Arc<AtomicBool>,
}

impl HapticActuator {
    /// Spawn the pulse runner task
    ///
    /// Returns the trigger handle and the runner's join handle; join it
    /// during shutdown to guarantee the pin ended up off.
    pub fn spawn(
        pin: impl HapticPin,
        shutdown: watch::Receiver<bool>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(1);
        let running = Arc::new(AtomicBool::new(false));
        let handle = tokio::spawn(run_pulses(pin, rx, shutdown, running.clone()));
        (Self { tx, running }, handle)
    }

    /// Request an alert pulse; non-blocking, fire-and-forget
    pub fn trigger(&self, intensity: u8) {
        self.request(PulseKind::Long { intensity });
    }

    /// Request a short feedback pulse; non-blocking, fire-and-forget
    pub fn feedback(&self) {
        self.request(PulseKind::Short);
    }

    fn request(&self, pulse: PulseKind) {
        // One buzz is one buzz: re-triggers while a pulse plays are no-ops
        if self.running.swap(true, Ordering::AcqRel) {
            log::debug!("pulse already in flight; {pulse:?} dropped");
            return;
        }
        if let Err(e) = self.tx.try_send(pulse) {
            self.running.store(false, Ordering::Release);
            log::warn!("pulse runner unavailable; {pulse:?} dropped: {e}");
        }
    }
}

/// Pulse runner: plays requested sequences until shutdown
async fn run_pulses(
    mut pin: impl HapticPin,
    mut rx: mpsc::Receiver<PulseKind>,
    mut shutdown: watch::Receiver<bool>,
    running: Arc<AtomicBool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            request = rx.recv() => match request {
                Some(pulse) => {
                    let interrupted = if pin.is_connected() {
                        !play(&mut pin, pulse, &mut shutdown).await
                    } else {
                        log::warn!("actuator not connected; {pulse:?} is a no-op");
                        false
                    };
                    running.store(false, Ordering::Release);
                    if interrupted {
                        break;
                    }
                }
                None => break,
            },
        }
    }

    // Never leave the motor energized, even if a pulse was cut short
    if let Err(e) = pin.off().await {
        log::warn!("failed to force actuator off during shutdown: {e}");
    }
}

/// Play one pulse; returns false when interrupted by shutdown
async fn play(
    pin: &mut impl HapticPin,
    pulse: PulseKind,
    shutdown: &mut watch::Receiver<bool>,
) -> bool {
    for (duty, hold) in pulse.plan() {
        if let Err(e) = pin.set_duty(duty).await {
            log::warn!("actuator write failed mid-pulse: {e}");
            return true;
        }
        tokio::select! {
            _ = shutdown.changed() => return false,
            _ = tokio::time::sleep(hold) => {}
        }
    }

    if let Err(e) = pin.off().await {
        log::warn!("actuator off failed after pulse: {e}");
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingPin {
        duties: Arc<Mutex<Vec<u8>>>,
        connected: bool,
    }

    impl RecordingPin {
        fn connected() -> Self {
            Self { duties: Arc::default(), connected: true }
        }
    }

    #[async_trait::async_trait]
    impl HapticPin for RecordingPin {
        async fn set_duty(&mut self, duty: u8) -> Result<(), ConnectorError> {
            self.duties.lock().unwrap().push(duty);
            Ok(())
        }

        async fn off(&mut self) -> Result<(), ConnectorError> {
            self.duties.lock().unwrap().push(0);
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }

    #[test]
    fn intensity_maps_onto_usable_duty_range() {
        assert_eq!(duty_for_intensity(0), 150);
        assert_eq!(duty_for_intensity(100), 255);
        assert_eq!(duty_for_intensity(50), 202);
        // Out-of-range intensity clamps
        assert_eq!(duty_for_intensity(200), 255);
    }

    #[test]
    fn long_pulse_plan_is_three_cycles() {
        let plan = PulseKind::Long { intensity: 100 }.plan();
        assert_eq!(plan.len(), 6);
        assert_eq!(plan[0], (255, Duration::from_secs(1)));
        assert_eq!(plan[1], (0, Duration::from_secs(1)));
        assert_eq!(plan[4].0, 255);
    }

    #[tokio::test(start_paused = true)]
    async fn pulse_plays_and_ends_off() {
        let pin = RecordingPin::connected();
        let duties = pin.duties.clone();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let (actuator, handle) = HapticActuator::spawn(pin, shutdown_rx);
        actuator.trigger(100);

        // Paused clock auto-advances through the sleeps
        tokio::time::sleep(Duration::from_secs(7)).await;

        let seen = duties.lock().unwrap().clone();
        // Three on/off cycles plus the final forced off
        assert_eq!(seen, vec![255, 0, 255, 0, 255, 0, 0]);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_forces_pin_off_mid_pulse() {
        let pin = RecordingPin::connected();
        let duties = pin.duties.clone();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let (actuator, handle) = HapticActuator::spawn(pin, shutdown_rx);
        actuator.trigger(100);

        // Let the pulse start, then pull the plug mid-sequence
        tokio::time::sleep(Duration::from_millis(1500)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        let seen = duties.lock().unwrap().clone();
        assert!(seen.len() < 7, "pulse must have been cut short");
        assert_eq!(*seen.last().unwrap(), 0, "pin must end up off");
    }

    #[tokio::test(start_paused = true)]
    async fn trigger_during_pulse_is_a_no_op() {
        let pin = RecordingPin::connected();
        let duties = pin.duties.clone();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let (actuator, handle) = HapticActuator::spawn(pin, shutdown_rx);
        actuator.trigger(100);
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Mid-pulse re-triggers are swallowed
        actuator.trigger(100);
        actuator.trigger(100);
        tokio::time::sleep(Duration::from_secs(10)).await;

        let seen = duties.lock().unwrap().clone();
        assert_eq!(seen, vec![255, 0, 255, 0, 255, 0, 0]);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
