//! Error types for the rotortrim CLI.

use std::path::PathBuf;

use rt_disk::DiskError;
use rt_trim::TrimError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Failed to read case file: {path}")]
    CaseFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid case file: {0}")]
    CaseParse(#[from] serde_yaml::Error),

    #[error("Give the rotor speed as exactly one of 'omega' or 'rpm'")]
    RotorSpeed,

    #[error("Disk setup failed: {0}")]
    Disk(#[from] DiskError),

    #[error("Trim setup failed: {0}")]
    Trim(#[from] TrimError),

    #[error("Failed to encode summary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Partition {rank} panicked")]
    PartitionPanicked { rank: usize },
}

pub type CliResult<T> = Result<T, CliError>;
