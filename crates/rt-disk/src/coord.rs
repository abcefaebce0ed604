//! Rotor disk reference frame.

use crate::error::{DiskError, DiskResult};
use rt_core::Vec3;
use serde::{Deserialize, Serialize};

/// Right-handed frame attached to the rotor hub.
///
/// `e1` is the roll axis, `e2` the pitch axis and `e3` the yaw (rotation)
/// axis. Azimuth is measured from `e1` towards `e2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateSystem {
    pub origin: Vec3,
    pub e1: Vec3,
    pub e2: Vec3,
    pub e3: Vec3,
}

impl CoordinateSystem {
    /// Build the frame from the rotation axis and a reference direction.
    ///
    /// The reference direction is projected onto the disk plane to give the
    /// roll axis, so it only needs to be non-parallel to `axis`.
    pub fn new(origin: Vec3, axis: Vec3, ref_dir: Vec3) -> DiskResult<Self> {
        let e3 = axis
            .try_normalize(f64::EPSILON)
            .ok_or_else(|| DiskError::InvalidGeometry {
                what: "rotation axis has zero length".to_string(),
            })?;
        let in_plane = ref_dir - e3 * ref_dir.dot(&e3);
        let e1 = in_plane
            .try_normalize(1e-12)
            .ok_or_else(|| DiskError::InvalidGeometry {
                what: "reference direction is parallel to the rotation axis".to_string(),
            })?;
        let e2 = e3.cross(&e1);

        Ok(Self { origin, e1, e2, e3 })
    }

    /// Frame at the origin with roll = x, pitch = y, yaw = z.
    pub fn cartesian() -> Self {
        Self {
            origin: Vec3::zeros(),
            e1: Vec3::x(),
            e2: Vec3::y(),
            e3: Vec3::z(),
        }
    }

    pub fn roll_axis(&self) -> &Vec3 {
        &self.e1
    }

    pub fn pitch_axis(&self) -> &Vec3 {
        &self.e2
    }

    pub fn yaw_axis(&self) -> &Vec3 {
        &self.e3
    }

    /// Point expressed in the local cartesian frame.
    pub fn to_local(&self, point: &Vec3) -> Vec3 {
        let d = point - self.origin;
        Vec3::new(d.dot(&self.e1), d.dot(&self.e2), d.dot(&self.e3))
    }

    /// Local cylindrical coordinates `(radius, azimuth, axial)`.
    ///
    /// Azimuth is in radians in `(-pi, pi]`.
    pub fn to_cylindrical(&self, point: &Vec3) -> Vec3 {
        let l = self.to_local(point);
        Vec3::new(l.x.hypot(l.y), l.y.atan2(l.x), l.z)
    }

    /// Inverse of [`Self::to_cylindrical`].
    pub fn from_cylindrical(&self, radius: f64, azimuth: f64, axial: f64) -> Vec3 {
        self.origin
            + self.e1 * (radius * azimuth.cos())
            + self.e2 * (radius * azimuth.sin())
            + self.e3 * axial
    }
}
