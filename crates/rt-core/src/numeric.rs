use crate::RtError;
use nalgebra::Vector3;

/// Floating point type used throughout system
pub type Real = f64;

/// Cartesian vector used for positions, velocities and forces.
pub type Vec3 = Vector3<Real>;

/// Additive floor for denominators that may vanish (sqrt of the smallest
/// "very small" value the CFD toolkit uses).
pub const ROOT_VSMALL: Real = 1.0e-150;

/// Stand-in for "not yet measured" residuals.
pub const GREAT: Real = 1.0e15;

#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Component-wise `nearly_equal` for 3-vectors.
pub fn nearly_equal_vec3(a: &Vec3, b: &Vec3, tol: Tolerances) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| nearly_equal(*x, *y, tol))
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, RtError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(RtError::NonFinite { what, value: v })
    }
}

pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, RtError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(RtError::InvalidArg { what })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn nearly_equal_vec3_checks_every_component() {
        let tol = Tolerances::default();
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert!(nearly_equal_vec3(&a, &Vec3::new(1.0, 2.0, 3.0), tol));
        assert!(!nearly_equal_vec3(&a, &Vec3::new(1.0, 2.0, 3.001), tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero() {
        assert!(ensure_positive(0.0, "omega").is_err());
        assert_eq!(ensure_positive(2.5, "omega").unwrap(), 2.5);
    }
}
