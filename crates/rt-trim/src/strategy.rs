//! The trim strategy contract.

use crate::dictionary::Dictionary;
use crate::error::TrimResult;
use crate::pitch::{PerCellPitch, PitchAngles};
use crate::report::{TracingReporter, TrimReporter};
use rt_core::Vec3;
use rt_disk::{ForceEvaluator, Reducer, SerialReducer};
use std::sync::Arc;

/// Collaborators shared by every strategy of one rotor disk.
#[derive(Clone)]
pub struct TrimContext {
    /// Disk force model for this partition.
    pub rotor: Arc<dyn ForceEvaluator>,
    /// Collective sum across partitions.
    pub reducer: Arc<dyn Reducer>,
    /// Diagnostics sink.
    pub reporter: Arc<dyn TrimReporter>,
}

impl TrimContext {
    /// Single-partition context reporting through `tracing`.
    pub fn serial(rotor: Arc<dyn ForceEvaluator>) -> Self {
        Self {
            rotor,
            reducer: Arc::new(SerialReducer),
            reporter: Arc::new(TracingReporter),
        }
    }

    pub fn with_reducer(mut self, reducer: Arc<dyn Reducer>) -> Self {
        self.reducer = reducer;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn TrimReporter>) -> Self {
        self.reporter = reporter;
        self
    }
}

/// Policy that sets the blade pitch of a rotor disk.
///
/// The owning rotor source calls [`TrimStrategy::correct`] once per
/// simulation step. All partitions of a decomposed run must call it with the
/// same `time_index` sequence.
pub trait TrimStrategy: Send {
    /// Name the strategy is registered under.
    fn type_name(&self) -> &'static str;

    /// Load parameters from the rotor dictionary.
    ///
    /// Coefficients live in the `<type_name>Coeffs` sub-dictionary, or in the
    /// rotor dictionary itself when that is absent.
    fn read(&mut self, dict: &Dictionary) -> TrimResult<()>;

    /// Update the pitch state for this step and write the disk body force.
    ///
    /// Only disk cells of `force` are written. Convergence problems are
    /// reported, never returned.
    fn correct(&mut self, time_index: u64, velocity: &[Vec3], force: &mut [Vec3]);

    /// Current control angles.
    fn pitch_angles(&self) -> PitchAngles;

    /// Per-cell pitch for the current control angles.
    fn per_cell_pitch(&self) -> PerCellPitch<'_>;
}
