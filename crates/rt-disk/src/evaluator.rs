//! Force evaluation contract between the trim strategies and the disk model.

use crate::geometry::DiskGeometry;
use rt_core::Vec3;

/// Per-cell body force model of an actuator disk.
///
/// Implementations are deterministic functions of the velocity field and the
/// per-cell pitch. Fields (`velocity`, `force`, density) are mesh-sized and
/// indexed by [`crate::DiskCell::cell`]; `pitch` is indexed by position in
/// [`DiskGeometry::cells`].
pub trait ForceEvaluator: Send + Sync {
    /// Disk cells owned by this partition.
    fn geometry(&self) -> &DiskGeometry;

    /// Rotor angular speed (rad/s).
    fn omega(&self) -> f64;

    /// Reference density used to make incompressible forces dimensional (kg/m^3).
    fn rho_ref(&self) -> f64;

    /// Mesh-sized density field, present only for compressible flow.
    fn rho(&self) -> Option<&[f64]> {
        None
    }

    fn compressible(&self) -> bool {
        self.rho().is_some()
    }

    /// Write the body force of every disk cell into `force`.
    ///
    /// Only entries for disk cells are touched; the rest of the buffer is left
    /// as the caller passed it.
    fn calculate(&self, velocity: &[Vec3], pitch: &[f64], force: &mut [Vec3]);
}
