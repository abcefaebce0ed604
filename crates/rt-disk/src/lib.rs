//! Actuator-disk collaborators for the trim controller.
//!
//! The trim strategies never look inside the CFD mesh. Everything they need is
//! reached through this crate:
//!
//! - [`CoordinateSystem`] and [`DiskGeometry`]: the disk frame and the owned
//!   disk cells with their local (radius, azimuth) coordinates
//! - [`ForceEvaluator`]: turns a velocity field and per-cell pitch into per-cell
//!   body force
//! - [`Reducer`]: the collective sum across partitions
//! - [`LinearDiskModel`]: a deterministic evaluator with a linear pitch response,
//!   used by the CLI and tests

pub mod coord;
pub mod error;
pub mod evaluator;
pub mod geometry;
pub mod linear;
pub mod reduce;

pub use coord::CoordinateSystem;
pub use error::{DiskError, DiskResult};
pub use evaluator::ForceEvaluator;
pub use geometry::{AnnulusSpec, DiskCell, DiskGeometry};
pub use linear::{LinearDiskModel, LinearResponse};
pub use reduce::{PartitionGroup, PartitionReducer, Reducer, SerialReducer};
