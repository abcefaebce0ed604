//! Target force/coefficient trim.
//!
//! Adjusts (theta0, theta1c, theta1s) with a damped Newton iteration until
//! the disk's aggregated (thrust, pitch moment, roll moment) matches a target,
//! in coefficient or dimensional space. The Jacobian is rebuilt by central
//! differences every iteration since the response is nonlinear in general.
//!
//! Per gated step the solve costs `7 * iterations` disk evaluations, each
//! followed by one collective sum.

use crate::aggregate::{TrimSpace, calc_response};
use crate::dictionary::Dictionary;
use crate::error::{ConfigError, TrimResult};
use crate::newton::{NewtonConfig, Response, damped_newton};
use crate::pitch::{PerCellPitch, PitchAngles, TargetVector};
use crate::report::{TrimEvent, TrimOutcome};
use crate::strategy::{TrimContext, TrimStrategy};
use rt_core::{Vec3, deg_to_rad};
use rt_disk::{ForceEvaluator, Reducer};

pub const TYPE_NAME: &str = "targetCoeffTrim";

pub struct TargetCoeffTrim {
    ctx: TrimContext,
    calc_frequency: u64,
    space: TrimSpace,
    target: TargetVector,
    theta: PitchAngles,
    newton: NewtonConfig,
    alpha: f64,
    final_evaluate: bool,
    last_outcome: Option<TrimOutcome>,
}

impl TargetCoeffTrim {
    /// Strategy with default parameters; call [`TrimStrategy::read`] before use.
    pub fn new(ctx: TrimContext) -> Self {
        Self {
            ctx,
            calc_frequency: 1,
            space: TrimSpace::Coefficients,
            target: TargetVector::default(),
            theta: PitchAngles::default(),
            newton: NewtonConfig::default(),
            alpha: 1.0,
            final_evaluate: false,
            last_outcome: None,
        }
    }

    pub fn from_dict(ctx: TrimContext, dict: &Dictionary) -> TrimResult<Self> {
        let mut trim = Self::new(ctx);
        trim.read(dict)?;
        Ok(trim)
    }

    pub fn boxed(ctx: TrimContext) -> Box<dyn TrimStrategy> {
        Box::new(Self::new(ctx))
    }

    pub fn space(&self) -> TrimSpace {
        self.space
    }

    pub fn target(&self) -> &TargetVector {
        &self.target
    }

    pub fn calc_frequency(&self) -> u64 {
        self.calc_frequency
    }

    pub fn newton_config(&self) -> &NewtonConfig {
        &self.newton
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Outcome of the most recent gated solve.
    pub fn last_outcome(&self) -> Option<&TrimOutcome> {
        self.last_outcome.as_ref()
    }

    fn should_solve(&self, time_index: u64) -> bool {
        time_index % self.calc_frequency == 0
    }

    fn report(&self, event: TrimEvent) {
        self.ctx.reporter.report(&event);
    }
}

fn invalid(dict: &Dictionary, key: &str, what: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        dict: dict.name().to_string(),
        key: key.to_string(),
        what: what.into(),
    }
}

fn finite(dict: &Dictionary, key: &str, v: f64) -> Result<f64, ConfigError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(invalid(dict, key, "must be finite"))
    }
}

impl TrimStrategy for TargetCoeffTrim {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn read(&mut self, dict: &Dictionary) -> TrimResult<()> {
        let coeffs = dict.optional_coeffs(TYPE_NAME)?;

        let target_dict = coeffs.sub_dict("target")?;
        let space = TrimSpace::from_use_coeffs(target_dict.lookup_or_default("useCoeffs", true)?);
        let ext = space.key_suffix();
        let mut target = [0.0; 3];
        for (slot, name) in target.iter_mut().zip(["thrust", "pitch", "roll"]) {
            let key = format!("{name}{ext}");
            *slot = finite(&target_dict, &key, target_dict.lookup(&key)?)?;
        }

        let pitch_dict = coeffs.sub_dict("pitchAngles")?;
        let mut theta = [0.0; 3];
        for (slot, key) in theta.iter_mut().zip(["theta0Ini", "theta1cIni", "theta1sIni"]) {
            *slot = deg_to_rad(finite(&pitch_dict, key, pitch_dict.lookup(key)?)?);
        }

        let calc_frequency: u64 = coeffs.lookup("calcFrequency")?;
        if calc_frequency == 0 {
            return Err(invalid(&coeffs, "calcFrequency", "must be at least 1").into());
        }

        let mut newton = self.newton;
        coeffs.read_if_present("nIter", &mut newton.max_iterations)?;
        coeffs.read_if_present("tol", &mut newton.tol)?;
        coeffs.read_if_present("relax", &mut newton.relax)?;
        finite(&coeffs, "tol", newton.tol)?;
        finite(&coeffs, "relax", newton.relax)?;

        let mut d_theta_deg: f64 = 0.0;
        if coeffs.read_if_present("dTheta", &mut d_theta_deg)? {
            if !(d_theta_deg.is_finite() && d_theta_deg > 0.0) {
                return Err(invalid(&coeffs, "dTheta", "must be positive").into());
            }
            newton.step = deg_to_rad(d_theta_deg);
        }

        let alpha = finite(&coeffs, "alpha", coeffs.lookup("alpha")?)?;
        let final_evaluate = coeffs.lookup_or_default("finalEvaluate", false)?;

        self.space = space;
        self.target = TargetVector::new(target[0], target[1], target[2]);
        self.theta = PitchAngles::new(theta[0], theta[1], theta[2]);
        self.calc_frequency = calc_frequency;
        self.newton = newton;
        self.alpha = alpha;
        self.final_evaluate = final_evaluate;

        tracing::debug!(
            model = TYPE_NAME,
            space = %self.space,
            calc_frequency,
            n_iter = self.newton.max_iterations,
            "trim coefficients read"
        );

        Ok(())
    }

    fn correct(&mut self, time_index: u64, velocity: &[Vec3], force: &mut [Vec3]) {
        if !self.should_solve(time_index) {
            return;
        }

        self.report(TrimEvent::Solving {
            model: TYPE_NAME.to_string(),
            time_index,
            space: self.space,
        });

        let rho_ref = self.ctx.rotor.rho_ref();
        let target = self.target.as_vector() / rho_ref;

        let mut probe = ForceProbe::new(
            self.ctx.rotor.as_ref(),
            self.ctx.reducer.as_ref(),
            self.space,
            self.alpha,
            velocity,
            force,
        );
        let result = damped_newton(self.theta.as_vector(), &target, &mut probe, &self.newton);

        // Leave the force of the last baseline evaluation, i.e. at the pitch
        // the final update started from, unless asked to evaluate the result.
        if self.final_evaluate && result.iterations > 0 {
            probe.evaluate(&result.x);
        } else {
            probe.restore_baseline();
        }

        self.theta = PitchAngles::from_vector(&result.x);

        if let Some(&first_iteration) = result.singular_iterations.first() {
            self.report(TrimEvent::SingularJacobian {
                model: TYPE_NAME.to_string(),
                count: result.singular_iterations.len(),
                first_iteration,
            });
        }

        if result.converged {
            self.report(TrimEvent::Converged {
                model: TYPE_NAME.to_string(),
                residual: result.residual,
                tolerance: self.newton.tol,
                iterations: result.iterations,
            });
        } else {
            self.report(TrimEvent::NotConverged {
                model: TYPE_NAME.to_string(),
                residual: result.residual,
                tolerance: self.newton.tol,
                iterations: result.iterations,
            });
        }

        let current = result.response * rho_ref;
        let outcome = TrimOutcome {
            time_index,
            space: self.space,
            converged: result.converged,
            iterations: result.iterations,
            residual: result.residual,
            tolerance: self.newton.tol,
            current: [current[0], current[1], current[2]],
            target: [self.target.thrust, self.target.pitch, self.target.roll],
            pitch: self.theta,
        };

        self.report(TrimEvent::Summary {
            model: TYPE_NAME.to_string(),
            space: self.space,
            current: outcome.current,
            target: outcome.target,
            pitch_deg: self.theta.to_degrees(),
        });

        self.last_outcome = Some(outcome);
    }

    fn pitch_angles(&self) -> PitchAngles {
        self.theta
    }

    fn per_cell_pitch(&self) -> PerCellPitch<'_> {
        PerCellPitch::new(self.theta, self.ctx.rotor.geometry())
    }
}

/// Evaluates the disk at trial pitch angles for the Newton loop.
struct ForceProbe<'a> {
    rotor: &'a dyn ForceEvaluator,
    reducer: &'a dyn Reducer,
    space: TrimSpace,
    alpha: f64,
    velocity: &'a [Vec3],
    force: &'a mut [Vec3],
    pitch: Vec<f64>,
    baseline_force: Vec<Vec3>,
}

impl<'a> ForceProbe<'a> {
    fn new(
        rotor: &'a dyn ForceEvaluator,
        reducer: &'a dyn Reducer,
        space: TrimSpace,
        alpha: f64,
        velocity: &'a [Vec3],
        force: &'a mut [Vec3],
    ) -> Self {
        let n = rotor.geometry().len();
        Self {
            rotor,
            reducer,
            space,
            alpha,
            velocity,
            force,
            pitch: Vec::with_capacity(n),
            baseline_force: Vec::with_capacity(n),
        }
    }

    fn evaluate(&mut self, x: &Vec3) -> Vec3 {
        PerCellPitch::new(PitchAngles::from_vector(x), self.rotor.geometry()).fill(&mut self.pitch);
        calc_response(
            self.rotor,
            self.reducer,
            self.space,
            self.alpha,
            self.velocity,
            &self.pitch,
            self.force,
        )
    }

    /// Put back the disk forces of the last baseline evaluation.
    fn restore_baseline(&mut self) {
        for (c, f) in self.rotor.geometry().cells().iter().zip(&self.baseline_force) {
            self.force[c.cell.slot()] = *f;
        }
    }
}

impl Response for ForceProbe<'_> {
    fn baseline(&mut self, x: &Vec3) -> Vec3 {
        let cf = self.evaluate(x);
        self.baseline_force.clear();
        let force = &*self.force;
        self.baseline_force
            .extend(self.rotor.geometry().cells().iter().map(|c| force[c.cell.slot()]));
        cf
    }

    fn probe(&mut self, x: &Vec3) -> Vec3 {
        self.evaluate(x)
    }
}
