//! End-to-end trim scenarios against deterministic disk models.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rt_core::{CellId, Vec3};
use rt_disk::{
    AnnulusSpec, CoordinateSystem, DiskGeometry, ForceEvaluator, LinearDiskModel, LinearResponse,
};
use rt_trim::{
    Dictionary, RecordingReporter, TargetCoeffTrim, TrimContext, TrimEvent, TrimRegistry,
    TrimSpace, TrimStrategy,
};

const RHO_REF: f64 = 1.2;

fn annulus_model(response: LinearResponse) -> (usize, Arc<LinearDiskModel>) {
    let spec = AnnulusSpec {
        root_radius: 0.2,
        tip_radius: 2.0,
        n_radial: 4,
        n_azimuthal: 16,
    };
    let (centres, geom) = DiskGeometry::annulus(CoordinateSystem::cartesian(), &spec).unwrap();
    (
        centres.len(),
        Arc::new(LinearDiskModel::new(geom, 30.0, RHO_REF, response).unwrap()),
    )
}

fn force_targets(thrust: f64, pitch: f64, roll: f64, extra: &str) -> Dictionary {
    let text = format!(
        r#"
trimModel: targetCoeffTrim
targetCoeffTrimCoeffs:
  calcFrequency: 1
  alpha: 1.0
  target:
    useCoeffs: false
    thrust: {thrust}
    pitch: {pitch}
    roll: {roll}
  pitchAngles:
    theta0Ini: 0.0
    theta1cIni: 0.0
    theta1sIni: 0.0
{extra}"#
    );
    Dictionary::from_yaml_str("rotor", &text).unwrap()
}

/// Wraps a model and counts disk evaluations.
struct Counting {
    inner: LinearDiskModel,
    calls: AtomicUsize,
}

impl ForceEvaluator for Counting {
    fn geometry(&self) -> &DiskGeometry {
        self.inner.geometry()
    }

    fn omega(&self) -> f64 {
        self.inner.omega()
    }

    fn rho_ref(&self) -> f64 {
        self.inner.rho_ref()
    }

    fn calculate(&self, velocity: &[Vec3], pitch: &[f64], force: &mut [Vec3]) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.calculate(velocity, pitch, force);
    }
}

#[test]
fn thrust_only_target_matches_closed_form() {
    let (n, rotor) = annulus_model(LinearResponse {
        lift_slope: 60.0,
        zero_pitch_thrust: 0.0,
        inflow_gain: 0.0,
    });
    let reporter = Arc::new(RecordingReporter::new());
    let ctx = TrimContext::serial(rotor.clone()).with_reporter(reporter.clone());
    let mut trim = TargetCoeffTrim::from_dict(ctx, &force_targets(1000.0, 0.0, 0.0, "")).unwrap();

    let velocity = vec![Vec3::zeros(); n];
    let mut force = vec![Vec3::zeros(); n];
    trim.correct(0, &velocity, &mut force);

    let (a, b) = rotor.aggregate_response(&velocity);
    let expected = a.try_inverse().unwrap() * (Vec3::new(1000.0, 0.0, 0.0) / RHO_REF - b);
    let theta = trim.pitch_angles().as_vector();
    assert!((theta - expected).norm() < 1e-6, "theta = {theta}, expected = {expected}");
    assert!(theta[1].abs() < 1e-9 && theta[2].abs() < 1e-9);

    let outcome = trim.last_outcome().unwrap();
    assert!(outcome.converged);
    assert_eq!(outcome.space, TrimSpace::Forces);
    assert!((outcome.current[0] - 1000.0).abs() < 1e-6);

    let events = reporter.take();
    assert!(matches!(events.first(), Some(TrimEvent::Solving { time_index: 0, .. })));
    assert!(events.iter().any(|e| matches!(e, TrimEvent::Converged { .. })));
    assert!(matches!(events.last(), Some(TrimEvent::Summary { .. })));
}

#[test]
fn coupled_three_cell_disk_reaches_all_targets() {
    // Irregular cells give a Jacobian with off-diagonal coupling.
    let cs = CoordinateSystem::new(
        Vec3::new(1.0, -2.0, 0.5),
        Vec3::new(0.0, 0.3, 1.0),
        Vec3::x(),
    )
    .unwrap();
    let centres = vec![
        cs.from_cylindrical(0.5, 0.3, 0.0),
        cs.from_cylindrical(0.8, 2.0, 0.0),
        cs.from_cylindrical(1.0, 4.0, 0.0),
    ];
    let ids: Vec<CellId> = (0..3).map(CellId::from_index).collect();
    let geom = DiskGeometry::from_centres(cs, &centres, &ids).unwrap();
    let response = LinearResponse {
        lift_slope: 25.0,
        zero_pitch_thrust: 1.5,
        inflow_gain: 0.4,
    };
    let rotor = Arc::new(LinearDiskModel::new(geom, 10.0, RHO_REF, response).unwrap());

    let velocity = vec![Vec3::new(0.2, -0.1, -3.0); 3];
    let (a, b) = rotor.aggregate_response(&velocity);
    assert!(a[(0, 1)].abs() > 1e-3 && a[(1, 2)].abs() > 1e-3);

    let target = Vec3::new(30.0, 2.0, -1.5);
    let ctx = TrimContext::serial(rotor.clone()).with_reporter(Arc::new(RecordingReporter::new()));
    let mut trim = TargetCoeffTrim::from_dict(
        ctx,
        &force_targets(target[0], target[1], target[2], ""),
    )
    .unwrap();

    let mut force = vec![Vec3::zeros(); 3];
    trim.correct(0, &velocity, &mut force);

    let expected = a.try_inverse().unwrap() * (target / RHO_REF - b);
    assert!((trim.pitch_angles().as_vector() - expected).norm() < 1e-6);

    let outcome = trim.last_outcome().unwrap();
    assert!(outcome.converged);
    for k in 0..3 {
        assert!((outcome.current[k] - target[k]).abs() < 1e-6);
    }
}

#[test]
fn coefficient_targets_are_met() {
    let (n, rotor) = annulus_model(LinearResponse {
        lift_slope: 80.0,
        zero_pitch_thrust: 0.3,
        inflow_gain: 0.0,
    });
    let text = r#"
targetCoeffTrimCoeffs:
  calcFrequency: 1
  alpha: 1.0
  target:
    thrustCoeff: 0.002
    pitchCoeff: 0.0001
    rollCoeff: -0.0001
  pitchAngles:
    theta0Ini: 2.0
    theta1cIni: 0.0
    theta1sIni: 0.0
"#;
    let dict = Dictionary::from_yaml_str("rotor", text).unwrap();
    let ctx = TrimContext::serial(rotor).with_reporter(Arc::new(RecordingReporter::new()));
    let mut trim = TargetCoeffTrim::from_dict(ctx, &dict).unwrap();
    assert_eq!(trim.space(), TrimSpace::Coefficients);

    let velocity = vec![Vec3::zeros(); n];
    let mut force = vec![Vec3::zeros(); n];
    trim.correct(0, &velocity, &mut force);

    let outcome = trim.last_outcome().unwrap();
    assert!(outcome.converged);
    let target = [0.002, 0.0001, -0.0001];
    for k in 0..3 {
        assert!(
            (outcome.current[k] - target[k]).abs() < 1e-9,
            "component {k}: {} vs {}",
            outcome.current[k],
            target[k]
        );
    }
}

#[test]
fn skipped_steps_leave_pitch_and_force_alone() {
    let (n, rotor) = annulus_model(LinearResponse {
        lift_slope: 60.0,
        zero_pitch_thrust: 0.0,
        inflow_gain: 0.0,
    });
    let reporter = Arc::new(RecordingReporter::new());
    let ctx = TrimContext::serial(rotor).with_reporter(reporter.clone());
    let text = r#"
calcFrequency: 3
alpha: 1.0
target: {useCoeffs: false, thrust: 1000.0, pitch: 0.0, roll: 0.0}
pitchAngles: {theta0Ini: 0, theta1cIni: 0, theta1sIni: 0}
"#;
    let dict = Dictionary::from_yaml_str("rotor", text).unwrap();
    let mut trim = TargetCoeffTrim::from_dict(ctx, &dict).unwrap();
    assert_eq!(trim.calc_frequency(), 3);

    let velocity = vec![Vec3::zeros(); n];
    let sentinel = Vec3::new(7.0, 7.0, 7.0);
    let mut force = vec![sentinel; n];

    for step in [1, 2, 4, 5] {
        trim.correct(step, &velocity, &mut force);
    }
    assert!(force.iter().all(|f| *f == sentinel));
    assert_eq!(trim.pitch_angles().as_vector(), Vec3::zeros());
    assert!(trim.last_outcome().is_none());
    assert!(reporter.events().is_empty());

    trim.correct(6, &velocity, &mut force);
    assert_eq!(trim.last_outcome().unwrap().time_index, 6);
    assert!(trim.pitch_angles().theta0 > 0.0);
}

#[test]
fn zero_gradient_runs_to_the_iteration_cap() {
    let spec = AnnulusSpec {
        root_radius: 0.0,
        tip_radius: 1.0,
        n_radial: 2,
        n_azimuthal: 8,
    };
    let (centres, geom) = DiskGeometry::annulus(CoordinateSystem::cartesian(), &spec).unwrap();
    let response = LinearResponse {
        lift_slope: 0.0,
        zero_pitch_thrust: 0.25,
        inflow_gain: 0.0,
    };
    let rotor = Arc::new(Counting {
        inner: LinearDiskModel::new(geom, 10.0, RHO_REF, response).unwrap(),
        calls: AtomicUsize::new(0),
    });
    let reporter = Arc::new(RecordingReporter::new());
    let ctx = TrimContext::serial(rotor.clone()).with_reporter(reporter.clone());
    let mut trim =
        TargetCoeffTrim::from_dict(ctx, &force_targets(100.0, 0.0, 0.0, "  nIter: 5\n")).unwrap();

    let n = centres.len();
    let velocity = vec![Vec3::zeros(); n];
    let mut force = vec![Vec3::zeros(); n];
    trim.correct(0, &velocity, &mut force);

    assert_eq!(rotor.calls.load(Ordering::SeqCst), 7 * 5);
    assert_eq!(trim.pitch_angles().as_vector(), Vec3::zeros());
    assert!(force.iter().all(|f| (f.z - 0.25).abs() < 1e-15));

    let outcome = trim.last_outcome().unwrap();
    assert!(!outcome.converged);
    assert_eq!(outcome.iterations, 5);

    let events = reporter.take();
    assert!(events.iter().any(|e| matches!(
        e,
        TrimEvent::SingularJacobian {
            count: 5,
            first_iteration: 0,
            ..
        }
    )));
    assert!(events
        .iter()
        .any(|e| matches!(e, TrimEvent::NotConverged { iterations: 5, .. })));
    assert!(!events.iter().any(|e| matches!(e, TrimEvent::Converged { .. })));
}

#[test]
fn converging_on_the_last_allowed_iteration_counts_as_converged() {
    // Affine disk: the first update lands on the answer, the second is the
    // vanishing step that meets the tolerance with no iterations to spare.
    let (n, rotor) = annulus_model(LinearResponse {
        lift_slope: 60.0,
        zero_pitch_thrust: 0.3,
        inflow_gain: 0.0,
    });
    let reporter = Arc::new(RecordingReporter::new());
    let ctx = TrimContext::serial(rotor.clone()).with_reporter(reporter.clone());
    let mut trim =
        TargetCoeffTrim::from_dict(ctx, &force_targets(800.0, 0.0, 0.0, "  nIter: 2\n")).unwrap();

    let velocity = vec![Vec3::zeros(); n];
    let mut force = vec![Vec3::zeros(); n];
    trim.correct(0, &velocity, &mut force);

    let outcome = trim.last_outcome().unwrap();
    assert_eq!(outcome.iterations, 2);
    assert!(outcome.converged);
    assert!(outcome.residual <= outcome.tolerance);

    let events = reporter.take();
    assert!(events
        .iter()
        .any(|e| matches!(e, TrimEvent::Converged { iterations: 2, .. })));
    assert!(!events.iter().any(|e| matches!(e, TrimEvent::NotConverged { .. })));
}

#[test]
fn evaluation_count_is_seven_per_iteration() {
    let (n, model) = annulus_model(LinearResponse {
        lift_slope: 60.0,
        zero_pitch_thrust: 0.0,
        inflow_gain: 0.0,
    });
    let inner = LinearDiskModel::new(model.geometry().clone(), 30.0, RHO_REF, *model.response()).unwrap();
    let rotor = Arc::new(Counting {
        inner,
        calls: AtomicUsize::new(0),
    });
    let ctx = TrimContext::serial(rotor.clone()).with_reporter(Arc::new(RecordingReporter::new()));
    let mut trim = TargetCoeffTrim::from_dict(ctx, &force_targets(500.0, 0.0, 0.0, "")).unwrap();

    let velocity = vec![Vec3::zeros(); n];
    let mut force = vec![Vec3::zeros(); n];
    trim.correct(0, &velocity, &mut force);

    let iterations = trim.last_outcome().unwrap().iterations;
    assert!(iterations >= 1);
    assert_eq!(rotor.calls.load(Ordering::SeqCst), 7 * iterations);
}

#[test]
fn registry_builds_a_working_strategy_by_name() {
    let (n, rotor) = annulus_model(LinearResponse {
        lift_slope: 60.0,
        zero_pitch_thrust: 0.0,
        inflow_gain: 0.0,
    });
    let ctx = TrimContext::serial(rotor).with_reporter(Arc::new(RecordingReporter::new()));
    let mut trim = TrimRegistry::global()
        .select(ctx, &force_targets(800.0, 0.0, 0.0, ""))
        .unwrap();
    assert_eq!(trim.type_name(), "targetCoeffTrim");

    let velocity = vec![Vec3::zeros(); n];
    let mut force = vec![Vec3::zeros(); n];
    trim.correct(0, &velocity, &mut force);

    let thrust: f64 = force.iter().map(|f| f.z).sum();
    assert!(thrust > 0.0);
    assert!(trim.pitch_angles().theta0 > 0.0);
}

#[test]
fn per_cell_pitch_is_repeatable_between_steps() {
    let (n, rotor) = annulus_model(LinearResponse {
        lift_slope: 60.0,
        zero_pitch_thrust: 0.0,
        inflow_gain: 0.0,
    });
    let ctx = TrimContext::serial(rotor.clone()).with_reporter(Arc::new(RecordingReporter::new()));
    let mut trim = TargetCoeffTrim::from_dict(ctx, &force_targets(600.0, 5.0, -5.0, "")).unwrap();

    let velocity = vec![Vec3::zeros(); n];
    let mut force = vec![Vec3::zeros(); n];
    trim.correct(0, &velocity, &mut force);

    let first: Vec<f64> = trim.per_cell_pitch().iter().collect();
    let second: Vec<f64> = trim.per_cell_pitch().into_iter().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), rotor.geometry().len());

    let angles = trim.pitch_angles();
    for (p, c) in first.iter().zip(rotor.geometry().cells()) {
        assert_eq!(*p, angles.at_azimuth(c.azimuth));
    }
}
