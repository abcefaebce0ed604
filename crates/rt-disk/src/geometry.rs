//! Disk cell selection and local polar coordinates.

use crate::coord::CoordinateSystem;
use crate::error::{DiskError, DiskResult};
use rt_core::{CellId, Vec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// One mesh cell inside the rotor disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskCell {
    /// Position of the cell in mesh-sized fields.
    pub cell: CellId,
    /// Cell centre in global coordinates.
    pub centre: Vec3,
    /// Distance from the rotation axis.
    pub radius: f64,
    /// Polar angle about the rotation axis, measured from the roll axis (radians).
    pub azimuth: f64,
}

/// The disk cells owned by one partition, in a fixed order.
///
/// Per-cell sequences (pitch, radius, azimuth) are always indexed by position
/// in [`DiskGeometry::cells`], not by mesh cell index.
#[derive(Debug, Clone)]
pub struct DiskGeometry {
    coord_sys: CoordinateSystem,
    cells: Vec<DiskCell>,
}

impl DiskGeometry {
    /// Select `cells` from the mesh and compute their local polar coordinates.
    pub fn from_centres(
        coord_sys: CoordinateSystem,
        centres: &[Vec3],
        cells: &[CellId],
    ) -> DiskResult<Self> {
        let mut disk_cells = Vec::with_capacity(cells.len());
        for &cell in cells {
            let centre = *centres.get(cell.slot()).ok_or(DiskError::FieldSize {
                what: "cell centres",
                expected: cell.slot() + 1,
                got: centres.len(),
            })?;
            let cyl = coord_sys.to_cylindrical(&centre);
            disk_cells.push(DiskCell {
                cell,
                centre,
                radius: cyl.x,
                azimuth: cyl.y,
            });
        }

        tracing::debug!(cells = disk_cells.len(), "disk geometry built");

        Ok(Self {
            coord_sys,
            cells: disk_cells,
        })
    }

    /// Build an annular disk on a structured (radial x azimuthal) cell layout.
    ///
    /// Returns the mesh cell centres together with the geometry. Mesh cells are
    /// numbered radially-outer-loop, so cell `i` of the geometry is mesh cell `i`.
    pub fn annulus(coord_sys: CoordinateSystem, spec: &AnnulusSpec) -> DiskResult<(Vec<Vec3>, Self)> {
        spec.validate()?;

        let dr = (spec.tip_radius - spec.root_radius) / spec.n_radial as f64;
        let dpsi = 2.0 * PI / spec.n_azimuthal as f64;

        let mut centres = Vec::with_capacity(spec.n_radial * spec.n_azimuthal);
        for i in 0..spec.n_radial {
            let r = spec.root_radius + (i as f64 + 0.5) * dr;
            for j in 0..spec.n_azimuthal {
                let psi = (j as f64 + 0.5) * dpsi;
                centres.push(coord_sys.from_cylindrical(r, psi, 0.0));
            }
        }

        let ids = (0..centres.len())
            .map(CellId::from_slot)
            .collect::<Result<Vec<_>, _>>()?;
        let geometry = Self::from_centres(coord_sys, &centres, &ids)?;
        Ok((centres, geometry))
    }

    pub fn coord_sys(&self) -> &CoordinateSystem {
        &self.coord_sys
    }

    pub fn cells(&self) -> &[DiskCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn azimuths(&self) -> impl ExactSizeIterator<Item = f64> + Clone + '_ {
        self.cells.iter().map(|c| c.azimuth)
    }

    /// Split the cells into `parts` contiguous, disjoint subsets.
    ///
    /// Mimics a domain decomposition; every mesh-sized field stays global so
    /// the pieces can share the same velocity and force buffers in tests.
    pub fn partition(&self, parts: usize) -> DiskResult<Vec<DiskGeometry>> {
        if parts == 0 {
            return Err(DiskError::InvalidGeometry {
                what: "partition count must be positive".to_string(),
            });
        }
        let chunk = self.cells.len().div_ceil(parts).max(1);
        let mut pieces: Vec<DiskGeometry> = self
            .cells
            .chunks(chunk)
            .map(|c| DiskGeometry {
                coord_sys: self.coord_sys,
                cells: c.to_vec(),
            })
            .collect();
        // Trailing partitions may own no disk cells but still take part in reductions.
        while pieces.len() < parts {
            pieces.push(DiskGeometry {
                coord_sys: self.coord_sys,
                cells: Vec::new(),
            });
        }
        Ok(pieces)
    }
}

/// Layout of a synthetic annular disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnnulusSpec {
    pub root_radius: f64,
    pub tip_radius: f64,
    pub n_radial: usize,
    pub n_azimuthal: usize,
}

impl AnnulusSpec {
    pub fn validate(&self) -> DiskResult<()> {
        if !(self.root_radius >= 0.0 && self.tip_radius > self.root_radius) {
            return Err(DiskError::InvalidGeometry {
                what: format!(
                    "need 0 <= root radius < tip radius, got {} and {}",
                    self.root_radius, self.tip_radius
                ),
            });
        }
        if self.n_radial == 0 || self.n_azimuthal == 0 {
            return Err(DiskError::InvalidGeometry {
                what: "annulus needs at least one radial and one azimuthal cell".to_string(),
            });
        }
        Ok(())
    }
}
