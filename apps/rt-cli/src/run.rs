//! Drives a trim strategy over a case, optionally split into partitions.

use std::sync::Arc;
use std::thread;

use rt_core::Vec3;
use rt_disk::{DiskGeometry, ForceEvaluator, PartitionGroup, Reducer, SerialReducer};
use rt_trim::{
    Dictionary, NullReporter, RecordingReporter, TracingReporter, TrimContext, TrimEvent,
    TrimRegistry, TrimReporter,
};
use serde::Serialize;

use crate::case::CaseFile;
use crate::error::{CliError, CliResult};

/// Options that override the case's `run` section.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOverrides {
    pub steps: Option<u64>,
    pub partitions: Option<usize>,
    /// Collect events instead of logging them.
    pub record: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub strategy: String,
    pub steps: u64,
    pub partitions: usize,
    pub disk_cells: usize,
    /// Final control angles (degrees).
    pub pitch_deg: [f64; 3],
    /// Total disk force along the rotation axis.
    pub thrust: f64,
    /// Events of the first partition; empty unless recorded.
    pub events: Vec<TrimEvent>,
}

struct PartitionRun {
    strategy: &'static str,
    pitch_deg: [f64; 3],
    /// Final force of the partition's own disk cells, by mesh slot.
    force: Vec<(usize, Vec3)>,
}

pub fn run_case(case: &CaseFile, overrides: RunOverrides) -> CliResult<RunSummary> {
    let steps = overrides.steps.unwrap_or(case.run.steps);
    let partitions = overrides.partitions.unwrap_or(case.run.partitions).max(1);
    let dict = case.rotor_dict()?;
    let (centres, geometry) = case.geometry()?;
    let n_cells = centres.len();
    let velocity = vec![case.inflow(); n_cells];

    let recorder = Arc::new(RecordingReporter::new());
    let reporter: Arc<dyn TrimReporter> = if overrides.record {
        recorder.clone()
    } else {
        Arc::new(TracingReporter)
    };

    tracing::info!(steps, partitions, disk_cells = geometry.len(), "starting trim run");

    let runs: Vec<PartitionRun> = if partitions == 1 {
        vec![run_partition(
            case,
            &dict,
            geometry.clone(),
            Arc::new(SerialReducer),
            reporter,
            &velocity,
            steps,
        )?]
    } else {
        let pieces = geometry.partition(partitions)?;
        let reducers = PartitionGroup::new(partitions);
        let results: Vec<CliResult<PartitionRun>> = thread::scope(|s| {
            let handles: Vec<_> = pieces
                .into_iter()
                .zip(reducers)
                .enumerate()
                .map(|(rank, (piece, reducer))| {
                    // Only the first partition reports, as a master process would.
                    let reporter: Arc<dyn TrimReporter> = if rank == 0 {
                        reporter.clone()
                    } else {
                        Arc::new(NullReporter)
                    };
                    let (dict, velocity) = (&dict, &velocity);
                    s.spawn(move || {
                        run_partition(case, dict, piece, Arc::new(reducer), reporter, velocity, steps)
                    })
                })
                .collect();
            handles
                .into_iter()
                .enumerate()
                .map(|(rank, h)| {
                    h.join()
                        .unwrap_or_else(|_| Err(CliError::PartitionPanicked { rank }))
                })
                .collect()
        });
        results.into_iter().collect::<CliResult<_>>()?
    };

    let yaw = *geometry.coord_sys().yaw_axis();
    let mut force = vec![Vec3::zeros(); n_cells];
    for &(i, f) in runs.iter().flat_map(|r| &r.force) {
        force[i] = f;
    }
    let thrust: f64 = geometry.cells().iter().map(|c| force[c.cell.slot()].dot(&yaw)).sum();

    let first = &runs[0];
    Ok(RunSummary {
        strategy: first.strategy.to_string(),
        steps,
        partitions,
        disk_cells: geometry.len(),
        pitch_deg: first.pitch_deg,
        thrust,
        events: recorder.take(),
    })
}

fn run_partition(
    case: &CaseFile,
    dict: &Dictionary,
    piece: DiskGeometry,
    reducer: Arc<dyn Reducer>,
    reporter: Arc<dyn TrimReporter>,
    velocity: &[Vec3],
    steps: u64,
) -> CliResult<PartitionRun> {
    let rotor = Arc::new(case.model(piece, velocity.len())?);
    let ctx = TrimContext::serial(rotor.clone())
        .with_reducer(reducer)
        .with_reporter(reporter);

    // Every partition reads the same dictionary, so either all fail here or
    // none do and no partition is left waiting in a reduction.
    let mut strategy = TrimRegistry::global().select(ctx, dict)?;

    let mut force = vec![Vec3::zeros(); velocity.len()];
    for step in 0..steps {
        strategy.correct(step, velocity, &mut force);
    }

    Ok(PartitionRun {
        strategy: strategy.type_name(),
        pitch_deg: strategy.pitch_angles().to_degrees(),
        force: rotor
            .geometry()
            .cells()
            .iter()
            .map(|c| (c.cell.slot(), force[c.cell.slot()]))
            .collect(),
    })
}

/// Build the strategy against the whole disk without running it.
pub fn validate_case(case: &CaseFile) -> CliResult<(String, usize)> {
    let dict = case.rotor_dict()?;
    let (centres, geometry) = case.geometry()?;
    let rotor = Arc::new(case.model(geometry, centres.len())?);
    let cells = rotor.geometry().len();
    let ctx = TrimContext::serial(rotor).with_reporter(Arc::new(NullReporter));
    let strategy = TrimRegistry::global().select(ctx, &dict)?;
    Ok((strategy.type_name().to_string(), cells))
}
