//! Rotor trim controllers for actuator-disk sources.
//!
//! A trim strategy owns the three blade-pitch angles (collective, lateral
//! cyclic, longitudinal cyclic) of a rotor disk and, once per simulation step,
//! writes the disk body force for the current velocity field. The
//! `targetCoeffTrim` strategy adjusts the angles with a damped Newton iteration
//! so that the aggregated thrust, pitch moment and roll moment match a target.
//!
//! # Architecture
//!
//! - [`TrimStrategy`]: the polymorphic contract (`read`, `correct`, `per_cell_pitch`)
//! - [`TrimRegistry`]: construct-by-name table of strategies
//! - [`jacobian`] and [`newton`]: the numerical core, independent of the disk
//! - [`aggregate`]: projection of per-cell forces onto the hub axes plus the
//!   collective sum across partitions
//! - [`report`]: structured diagnostics delivered to an injected sink

pub mod aggregate;
pub mod dictionary;
pub mod error;
pub mod fixed;
pub mod jacobian;
pub mod newton;
pub mod pitch;
pub mod registry;
pub mod report;
pub mod strategy;
pub mod target_coeff;

pub use aggregate::{TrimSpace, calc_response, local_response};
pub use dictionary::Dictionary;
pub use error::{ConfigError, ConfigResult, TrimError, TrimResult};
pub use fixed::FixedTrim;
pub use newton::{NewtonConfig, NewtonResult, Response, damped_newton};
pub use pitch::{PerCellPitch, PitchAngles, PitchIter, TargetVector};
pub use registry::{StrategyCtor, TrimRegistry};
pub use report::{
    NullReporter, RecordingReporter, TracingReporter, TrimEvent, TrimOutcome, TrimReporter,
};
pub use strategy::{TrimContext, TrimStrategy};
pub use target_coeff::TargetCoeffTrim;
