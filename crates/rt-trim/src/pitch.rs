//! Pitch state and the per-cell pitch projection.

use rt_core::{Vec3, rad_to_deg};
use rt_disk::{DiskCell, DiskGeometry};
use serde::Serialize;

/// Blade pitch control angles (radians).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PitchAngles {
    /// Collective.
    pub theta0: f64,
    /// Lateral cyclic, multiplies `cos(psi)`.
    pub theta1c: f64,
    /// Longitudinal cyclic, multiplies `sin(psi)`.
    pub theta1s: f64,
}

impl PitchAngles {
    pub fn new(theta0: f64, theta1c: f64, theta1s: f64) -> Self {
        Self {
            theta0,
            theta1c,
            theta1s,
        }
    }

    pub fn from_vector(v: &Vec3) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    pub fn as_vector(&self) -> Vec3 {
        Vec3::new(self.theta0, self.theta1c, self.theta1s)
    }

    /// Local blade pitch at azimuth `psi`.
    #[inline]
    pub fn at_azimuth(&self, psi: f64) -> f64 {
        let (s, c) = psi.sin_cos();
        self.theta0 + self.theta1c * c + self.theta1s * s
    }

    pub fn to_degrees(&self) -> [f64; 3] {
        [
            rad_to_deg(self.theta0),
            rad_to_deg(self.theta1c),
            rad_to_deg(self.theta1s),
        ]
    }
}

/// Requested (thrust, pitch moment, roll moment).
///
/// Dimensional or coefficient valued depending on the strategy's
/// [`crate::TrimSpace`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TargetVector {
    pub thrust: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl TargetVector {
    pub fn new(thrust: f64, pitch: f64, roll: f64) -> Self {
        Self {
            thrust,
            pitch,
            roll,
        }
    }

    pub fn as_vector(&self) -> Vec3 {
        Vec3::new(self.thrust, self.pitch, self.roll)
    }
}

/// Per-cell pitch of a disk, computed lazily from the control angles.
///
/// Cheap to copy; every call to [`PerCellPitch::iter`] restarts the sequence.
#[derive(Debug, Clone, Copy)]
pub struct PerCellPitch<'a> {
    angles: PitchAngles,
    cells: &'a [DiskCell],
}

impl<'a> PerCellPitch<'a> {
    pub fn new(angles: PitchAngles, geometry: &'a DiskGeometry) -> Self {
        Self {
            angles,
            cells: geometry.cells(),
        }
    }

    pub fn angles(&self) -> PitchAngles {
        self.angles
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> PitchIter<'a> {
        PitchIter {
            angles: self.angles,
            cells: self.cells.iter(),
        }
    }

    /// Overwrite `buf` with the pitch of every cell.
    pub fn fill(&self, buf: &mut Vec<f64>) {
        buf.clear();
        buf.extend(self.iter());
    }
}

impl<'a> IntoIterator for PerCellPitch<'a> {
    type Item = f64;
    type IntoIter = PitchIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct PitchIter<'a> {
    angles: PitchAngles,
    cells: std::slice::Iter<'a, DiskCell>,
}

impl Iterator for PitchIter<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        self.cells.next().map(|c| self.angles.at_azimuth(c.azimuth))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.cells.size_hint()
    }
}

impl ExactSizeIterator for PitchIter<'_> {}
