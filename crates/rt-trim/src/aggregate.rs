//! Aggregation of per-cell disk forces into (thrust, pitch moment, roll moment).

use rt_core::{ROOT_VSMALL, Vec3};
use rt_disk::{ForceEvaluator, Reducer};
use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;

/// Space in which responses and targets are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimSpace {
    /// Non-dimensional coefficients, normalized by `alpha w^2 pi r^4 [rho]`.
    Coefficients,
    /// Raw forces and moments as returned by the evaluator.
    Forces,
}

impl TrimSpace {
    pub fn from_use_coeffs(use_coeffs: bool) -> Self {
        if use_coeffs {
            TrimSpace::Coefficients
        } else {
            TrimSpace::Forces
        }
    }

    /// Suffix of the target keywords (`thrustCoeff` vs `thrust`).
    pub fn key_suffix(self) -> &'static str {
        match self {
            TrimSpace::Coefficients => "Coeff",
            TrimSpace::Forces => "",
        }
    }
}

impl fmt::Display for TrimSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrimSpace::Coefficients => write!(f, "coefficients"),
            TrimSpace::Forces => write!(f, "forces"),
        }
    }
}

/// Sum of the projected force and moment over this partition's disk cells.
///
/// Moments are taken about the disk origin: `m = f x (c - origin)`. In
/// coefficient space each cell is divided by `alpha w^2 pi r^4` (times the
/// cell density when compressible), moments once more by `r`.
pub fn local_response(
    rotor: &dyn ForceEvaluator,
    space: TrimSpace,
    alpha: f64,
    force: &[Vec3],
) -> Vec3 {
    let geometry = rotor.geometry();
    let cs = geometry.coord_sys();
    let rho = rotor.rho();

    let coeff1 = alpha * rotor.omega().powi(2) * PI;

    let mut cf = Vec3::zeros();
    for c in geometry.cells() {
        let i = c.cell.slot();
        let fc = force[i];
        let mc = fc.cross(&(c.centre - cs.origin));

        let thrust = fc.dot(cs.yaw_axis());
        let pitch = mc.dot(cs.pitch_axis());
        let roll = mc.dot(cs.roll_axis());

        match space {
            TrimSpace::Coefficients => {
                let radius = c.radius;
                let mut coeff2 = coeff1 * radius.powi(4);
                if let Some(rho) = rho {
                    coeff2 *= rho[i];
                }
                cf[0] += thrust / (coeff2 + ROOT_VSMALL);
                cf[1] += pitch / (coeff2 * radius + ROOT_VSMALL);
                cf[2] += roll / (coeff2 * radius + ROOT_VSMALL);
            }
            TrimSpace::Forces => {
                cf[0] += thrust;
                cf[1] += pitch;
                cf[2] += roll;
            }
        }
    }
    cf
}

/// Evaluate the disk at `pitch` and return the globally reduced response.
///
/// Writes the disk cells of `force`. Performs exactly one collective sum.
pub fn calc_response(
    rotor: &dyn ForceEvaluator,
    reducer: &dyn Reducer,
    space: TrimSpace,
    alpha: f64,
    velocity: &[Vec3],
    pitch: &[f64],
    force: &mut [Vec3],
) -> Vec3 {
    rotor.calculate(velocity, pitch, force);
    reducer.sum(local_response(rotor, space, alpha, force))
}
