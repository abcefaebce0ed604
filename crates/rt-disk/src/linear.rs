//! Deterministic disk model with a linear pitch response.
//!
//! Each disk cell pushes along the yaw axis with
//! `T = lift_slope * pitch + zero_pitch_thrust - inflow_gain * (U . yaw)`.
//! The aggregated thrust and hub moments are therefore affine in the pitch
//! angles, which gives trim problems with a closed-form answer.

use crate::error::{DiskError, DiskResult};
use crate::evaluator::ForceEvaluator;
use crate::geometry::DiskGeometry;
use nalgebra::Matrix3;
use rt_core::{Vec3, ensure_finite, ensure_positive};
use serde::{Deserialize, Serialize};

/// Per-cell response coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearResponse {
    /// Thrust per cell per radian of local pitch.
    pub lift_slope: f64,
    /// Thrust per cell at zero pitch.
    #[serde(default)]
    pub zero_pitch_thrust: f64,
    /// Thrust lost per unit of axial inflow through the cell.
    #[serde(default)]
    pub inflow_gain: f64,
}

pub struct LinearDiskModel {
    geometry: DiskGeometry,
    omega: f64,
    rho_ref: f64,
    rho: Option<Vec<f64>>,
    response: LinearResponse,
}

impl LinearDiskModel {
    pub fn new(
        geometry: DiskGeometry,
        omega: f64,
        rho_ref: f64,
        response: LinearResponse,
    ) -> DiskResult<Self> {
        ensure_positive(omega.abs(), "omega")?;
        ensure_positive(rho_ref, "rho_ref")?;
        ensure_finite(response.lift_slope, "lift_slope")?;
        ensure_finite(response.zero_pitch_thrust, "zero_pitch_thrust")?;
        ensure_finite(response.inflow_gain, "inflow_gain")?;

        Ok(Self {
            geometry,
            omega,
            rho_ref,
            rho: None,
            response,
        })
    }

    /// Treat the flow as compressible with the given mesh-sized density field.
    pub fn with_density(mut self, rho: Vec<f64>) -> DiskResult<Self> {
        let needed = self
            .geometry
            .cells()
            .iter()
            .map(|c| c.cell.slot() + 1)
            .max()
            .unwrap_or(0);
        if rho.len() < needed {
            return Err(DiskError::FieldSize {
                what: "density",
                expected: needed,
                got: rho.len(),
            });
        }
        self.rho = Some(rho);
        Ok(self)
    }

    pub fn response(&self) -> &LinearResponse {
        &self.response
    }

    fn cell_thrust(&self, velocity: &Vec3, pitch: f64) -> f64 {
        let axial = velocity.dot(self.geometry.coord_sys().yaw_axis());
        self.response.lift_slope * pitch + self.response.zero_pitch_thrust
            - self.response.inflow_gain * axial
    }

    /// Affine map `(A, b)` from pitch angles to the dimensional
    /// (thrust, pitch moment, roll moment) summed over this partition's cells.
    pub fn aggregate_response(&self, velocity: &[Vec3]) -> (Matrix3<f64>, Vec3) {
        let mut a = Matrix3::zeros();
        let mut b = Vec3::zeros();
        for c in self.geometry.cells() {
            let (s, co) = c.azimuth.sin_cos();
            let lever = Vec3::new(1.0, c.radius * co, -c.radius * s);
            let pitch_map = Vec3::new(1.0, co, s);
            a += lever * pitch_map.transpose() * self.response.lift_slope;
            b += lever * self.cell_thrust(&velocity[c.cell.slot()], 0.0);
        }
        (a, b)
    }
}

impl ForceEvaluator for LinearDiskModel {
    fn geometry(&self) -> &DiskGeometry {
        &self.geometry
    }

    fn omega(&self) -> f64 {
        self.omega
    }

    fn rho_ref(&self) -> f64 {
        self.rho_ref
    }

    fn rho(&self) -> Option<&[f64]> {
        self.rho.as_deref()
    }

    fn calculate(&self, velocity: &[Vec3], pitch: &[f64], force: &mut [Vec3]) {
        let yaw = *self.geometry.coord_sys().yaw_axis();
        for (c, &p) in self.geometry.cells().iter().zip(pitch) {
            let i = c.cell.slot();
            force[i] = yaw * self.cell_thrust(&velocity[i], p);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::CoordinateSystem;
    use crate::geometry::AnnulusSpec;

    fn model(inflow_gain: f64) -> (usize, LinearDiskModel) {
        let spec = AnnulusSpec {
            root_radius: 0.1,
            tip_radius: 1.0,
            n_radial: 3,
            n_azimuthal: 12,
        };
        let (centres, geom) = DiskGeometry::annulus(CoordinateSystem::cartesian(), &spec).unwrap();
        let response = LinearResponse {
            lift_slope: 50.0,
            zero_pitch_thrust: 2.0,
            inflow_gain,
        };
        (
            centres.len(),
            LinearDiskModel::new(geom, 30.0, 1.2, response).unwrap(),
        )
    }

    #[test]
    fn collective_pitch_pushes_along_yaw_axis() {
        let (n, m) = model(0.0);
        let velocity = vec![Vec3::zeros(); n];
        let pitch = vec![0.1; m.geometry().len()];
        let mut force = vec![Vec3::zeros(); n];
        m.calculate(&velocity, &pitch, &mut force);

        for f in &force {
            assert!((f.z - 7.0).abs() < 1e-12);
            assert_eq!(f.x, 0.0);
            assert_eq!(f.y, 0.0);
        }
    }

    #[test]
    fn inflow_reduces_thrust() {
        let (n, m) = model(3.0);
        let velocity = vec![Vec3::new(0.0, 0.0, 1.0); n];
        let pitch = vec![0.0; m.geometry().len()];
        let mut force = vec![Vec3::zeros(); n];
        m.calculate(&velocity, &pitch, &mut force);
        assert!((force[0].z + 1.0).abs() < 1e-12);
    }

    #[test]
    fn uniform_azimuth_decouples_the_response() {
        let (n, m) = model(0.0);
        let (a, b) = m.aggregate_response(&vec![Vec3::zeros(); n]);

        assert!((a[(0, 0)] - 50.0 * 36.0).abs() < 1e-9);
        assert!(a[(0, 1)].abs() < 1e-9 && a[(0, 2)].abs() < 1e-9);
        assert!(a[(1, 2)].abs() < 1e-9 && a[(2, 1)].abs() < 1e-9);
        assert!(a[(1, 1)] > 0.0 && a[(2, 2)] < 0.0);
        assert!((b[0] - 2.0 * 36.0).abs() < 1e-9);
    }

    #[test]
    fn short_density_field_is_rejected() {
        let (_, m) = model(0.0);
        assert!(m.with_density(vec![1.0; 3]).is_err());
    }
}
