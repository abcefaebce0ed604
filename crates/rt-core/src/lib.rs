//! rt-core: shared foundation for rotortrim.
//!
//! Contains:
//! - units (uom SI types + constructors for angles and rotor speed)
//! - numeric (Real, Vec3, tolerances + float helpers)
//! - ids (compact IDs for mesh cells and partitions)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{RtError, RtResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
