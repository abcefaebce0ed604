//! Error types for disk setup.

use rt_core::RtError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiskError {
    #[error("Invalid geometry: {what}")]
    InvalidGeometry { what: String },

    #[error("Field size mismatch for {what}: expected {expected}, got {got}")]
    FieldSize {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Core error: {0}")]
    Core(#[from] RtError),
}

pub type DiskResult<T> = Result<T, DiskError>;

impl From<DiskError> for RtError {
    fn from(e: DiskError) -> Self {
        match e {
            DiskError::InvalidGeometry { what: _ } => RtError::InvalidArg { what: "geometry" },
            DiskError::FieldSize {
                what,
                expected,
                got,
            } => RtError::FieldSize {
                what,
                expected,
                got,
            },
            DiskError::Core(e) => e,
        }
    }
}
