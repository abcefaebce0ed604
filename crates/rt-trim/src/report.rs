//! Structured trim diagnostics.
//!
//! Strategies never write to a log directly. They emit [`TrimEvent`]s to the
//! [`TrimReporter`] they were constructed with; the sink decides whether the
//! events become tracing output, test assertions or a JSON summary.

use crate::aggregate::TrimSpace;
use crate::pitch::PitchAngles;
use serde::Serialize;
use std::sync::{Mutex, PoisonError};

/// One diagnostic produced by a trim strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TrimEvent {
    /// A gated solve is starting.
    Solving {
        model: String,
        time_index: u64,
        space: TrimSpace,
    },
    /// Some Jacobians could not be inverted; those updates were skipped.
    SingularJacobian {
        model: String,
        count: usize,
        first_iteration: usize,
    },
    Converged {
        model: String,
        residual: f64,
        tolerance: f64,
        iterations: usize,
    },
    NotConverged {
        model: String,
        residual: f64,
        tolerance: f64,
        iterations: usize,
    },
    /// Current vs target response and the new pitch angles (degrees).
    Summary {
        model: String,
        space: TrimSpace,
        current: [f64; 3],
        target: [f64; 3],
        pitch_deg: [f64; 3],
    },
}

/// Sink for [`TrimEvent`]s.
pub trait TrimReporter: Send + Sync {
    fn report(&self, event: &TrimEvent);
}

/// Renders events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl TrimReporter for TracingReporter {
    fn report(&self, event: &TrimEvent) {
        match event {
            TrimEvent::Solving {
                model,
                time_index,
                space,
            } => {
                tracing::info!(%model, time_index, "solving for target trim {space}");
            }
            TrimEvent::SingularJacobian {
                model,
                count,
                first_iteration,
            } => {
                tracing::warn!(
                    %model,
                    count,
                    first_iteration,
                    "singular Jacobian, pitch update skipped"
                );
            }
            TrimEvent::Converged {
                model,
                residual,
                tolerance,
                iterations,
            } => {
                tracing::info!(
                    %model,
                    "final residual = {residual:e} ({tolerance:e}), iterations = {iterations}"
                );
            }
            TrimEvent::NotConverged {
                model,
                residual,
                tolerance,
                iterations,
            } => {
                tracing::warn!(
                    %model,
                    "solution not converged in {iterations} iterations, final residual = {residual:e} ({tolerance:e})"
                );
            }
            TrimEvent::Summary {
                model,
                space,
                current,
                target,
                pitch_deg,
            } => {
                tracing::info!(
                    %model,
                    "current and target {space}: thrust = {}, {}; pitch = {}, {}; roll = {}, {}",
                    current[0],
                    target[0],
                    current[1],
                    target[1],
                    current[2],
                    target[2]
                );
                tracing::info!(
                    %model,
                    theta0 = pitch_deg[0],
                    theta1c = pitch_deg[1],
                    theta1s = pitch_deg[2],
                    "new pitch angles [deg]"
                );
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl TrimReporter for NullReporter {
    fn report(&self, _event: &TrimEvent) {}
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<TrimEvent>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TrimEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<TrimEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl TrimReporter for RecordingReporter {
    fn report(&self, event: &TrimEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Result of the latest gated solve of a strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrimOutcome {
    pub time_index: u64,
    pub space: TrimSpace,
    pub converged: bool,
    pub iterations: usize,
    pub residual: f64,
    pub tolerance: f64,
    /// Last baseline response, scaled back by the reference density.
    pub current: [f64; 3],
    pub target: [f64; 3],
    /// Pitch angles after the solve.
    pub pitch: PitchAngles,
}
