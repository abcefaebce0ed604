//! Case files: a synthetic annular disk plus the rotor trim dictionary.
//!
//! ```yaml
//! disk:
//!   annulus: {root_radius: 0.2, tip_radius: 2.0, n_radial: 8, n_azimuthal: 36}
//!   omega: 40.0
//!   rho_ref: 1.2
//!   response: {lift_slope: 25.0}
//! run:
//!   steps: 4
//! rotor:
//!   trimModel: targetCoeffTrim
//!   targetCoeffTrimCoeffs: { ... }
//! ```

use std::path::Path;

use rt_core::{Vec3, rad_per_s, rpm, to_rad_per_s};
use rt_disk::{AnnulusSpec, CoordinateSystem, DiskGeometry, LinearDiskModel, LinearResponse};
use rt_trim::Dictionary;
use serde::Deserialize;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, Deserialize)]
pub struct CaseFile {
    pub disk: DiskSection,
    #[serde(default)]
    pub run: RunSection,
    /// Rotor dictionary handed to the trim strategy as-is.
    pub rotor: serde_yaml::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiskSection {
    #[serde(default)]
    pub origin: [f64; 3],
    #[serde(default = "default_axis")]
    pub axis: [f64; 3],
    #[serde(default = "default_ref_dir")]
    pub ref_dir: [f64; 3],
    pub annulus: AnnulusSpec,
    /// Rotational speed (rad/s); give this or `rpm`.
    #[serde(default)]
    pub omega: Option<f64>,
    #[serde(default)]
    pub rpm: Option<f64>,
    pub rho_ref: f64,
    pub response: LinearResponse,
    /// Uniform density; makes the disk compressible when set.
    #[serde(default)]
    pub density: Option<f64>,
}

fn default_axis() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}

fn default_ref_dir() -> [f64; 3] {
    [1.0, 0.0, 0.0]
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunSection {
    #[serde(default = "default_steps")]
    pub steps: u64,
    #[serde(default = "default_partitions")]
    pub partitions: usize,
    /// Uniform velocity through the disk.
    #[serde(default)]
    pub inflow: [f64; 3],
}

fn default_steps() -> u64 {
    1
}

fn default_partitions() -> usize {
    1
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            partitions: default_partitions(),
            inflow: [0.0; 3],
        }
    }
}

impl CaseFile {
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| CliError::CaseFileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> CliResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn rotor_dict(&self) -> CliResult<Dictionary> {
        Dictionary::from_value("rotor", self.rotor.clone())
            .map_err(|e| CliError::Trim(e.into()))
    }

    /// Mesh cell centres and the whole-disk geometry.
    pub fn geometry(&self) -> CliResult<(Vec<Vec3>, DiskGeometry)> {
        let d = &self.disk;
        let cs = CoordinateSystem::new(
            Vec3::from(d.origin),
            Vec3::from(d.axis),
            Vec3::from(d.ref_dir),
        )?;
        Ok(DiskGeometry::annulus(cs, &d.annulus)?)
    }

    /// Rotational speed in rad/s.
    pub fn omega(&self) -> CliResult<f64> {
        let speed = match (self.disk.omega, self.disk.rpm) {
            (Some(w), None) => rad_per_s(w),
            (None, Some(n)) => rpm(n),
            _ => return Err(CliError::RotorSpeed),
        };
        Ok(to_rad_per_s(speed))
    }

    /// Disk model over `geometry`, sized for a mesh of `n_cells`.
    pub fn model(&self, geometry: DiskGeometry, n_cells: usize) -> CliResult<LinearDiskModel> {
        let d = &self.disk;
        let model = LinearDiskModel::new(geometry, self.omega()?, d.rho_ref, d.response)?;
        match d.density {
            Some(rho) => Ok(model.with_density(vec![rho; n_cells])?),
            None => Ok(model),
        }
    }

    pub fn inflow(&self) -> Vec3 {
        Vec3::from(self.run.inflow)
    }
}
