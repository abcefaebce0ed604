//! Damped Newton iteration on the pitch angles.

use crate::jacobian::central_difference_jacobian;
use rt_core::{GREAT, Vec3, deg_to_rad};

/// Newton solver configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Tolerance on the norm of the pitch update (radians)
    pub tol: f64,
    /// Relaxation applied to every update
    pub relax: f64,
    /// Finite difference step (radians)
    pub step: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            tol: 1e-8,
            relax: 1.0,
            step: deg_to_rad(0.1),
        }
    }
}

/// Newton iteration result.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonResult {
    /// Final pitch angles
    pub x: Vec3,
    /// Norm of the last update (GREAT if nothing was measured)
    pub residual: f64,
    /// Number of iterations
    pub iterations: usize,
    /// Converged flag
    pub converged: bool,
    /// Baseline response of the last iteration (at the second-to-last x)
    pub response: Vec3,
    /// Iterations whose Jacobian could not be inverted
    pub singular_iterations: Vec<usize>,
}

/// Response surface probed by the Newton loop.
///
/// Closures work directly. Implement it by hand to tell baseline evaluations
/// apart from finite difference probes.
pub trait Response {
    /// Response at the point the next update starts from.
    fn baseline(&mut self, x: &Vec3) -> Vec3;

    /// Response at a finite difference probe point.
    fn probe(&mut self, x: &Vec3) -> Vec3;
}

impl<F> Response for F
where
    F: FnMut(&Vec3) -> Vec3,
{
    fn baseline(&mut self, x: &Vec3) -> Vec3 {
        self(x)
    }

    fn probe(&mut self, x: &Vec3) -> Vec3 {
        self(x)
    }
}

/// Drive `response(x)` towards `target`.
///
/// Each iteration evaluates the baseline once and probes six times, solves
/// `J dx = target - response(x)` and steps by `relax * dx`. Convergence is
/// judged on the step length, not on the response error.
///
/// A singular Jacobian leaves `x` unchanged for that iteration and resets the
/// residual to GREAT, so the loop keeps its fixed evaluation count and ends
/// at the iteration cap instead of producing non-finite angles.
pub fn damped_newton<R>(x0: Vec3, target: &Vec3, response: &mut R, config: &NewtonConfig) -> NewtonResult
where
    R: Response + ?Sized,
{
    let mut x = x0;
    let mut err = GREAT;
    let mut iter = 0;
    let mut old = Vec3::zeros();
    let mut singular_iterations = Vec::new();

    while err > config.tol && iter < config.max_iterations {
        let x_base = x;
        old = response.baseline(&x_base);

        let jac = central_difference_jacobian(&x_base, |p: &Vec3| response.probe(p), config.step);

        let dx = jac
            .try_inverse()
            .map(|inv| inv * (target - old))
            .filter(|dx| dx.iter().all(|v| v.is_finite()));

        match dx {
            Some(dx) => {
                let x_new = x + config.relax * dx;
                err = (x_new - x).norm();
                x = x_new;
            }
            None => {
                singular_iterations.push(iter);
                err = GREAT;
            }
        }

        iter += 1;
    }

    NewtonResult {
        x,
        residual: err,
        iterations: iter,
        converged: err <= config.tol,
        response: old,
        singular_iterations,
    }
}
