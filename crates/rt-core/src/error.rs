//! Errors shared by every rotortrim crate.
//!
//! Crate-level errors (`DiskError`, `TrimError`) convert into [`RtError`] so a
//! driver can report any setup failure through one type.

use thiserror::Error;

pub type RtResult<T> = Result<T, RtError>;

#[derive(Error, Debug)]
pub enum RtError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// A per-cell field does not match the mesh it is indexed by.
    #[error("Field size mismatch for {what}: expected {expected}, got {got}")]
    FieldSize {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// More cells than a compact [`crate::Id`] can number.
    #[error("Cell count {count} exceeds the id range")]
    TooManyCells { count: usize },

    #[error("Configuration error: {what}")]
    Config { what: String },
}
