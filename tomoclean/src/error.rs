//! Error types for the tomoclean pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while configuring or running the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] tomoclean_core::Error),

    /// Filter error
    #[error("filter error: {0}")]
    Filter(#[from] tomoclean_filter::FilterError),

    /// Reconstruction-side error
    #[error("reconstruction error: {0}")]
    Recon(#[from] tomoclean_recon::ReconError),

    /// Image I/O error
    #[error("I/O error: {0}")]
    Io(#[from] tomoclean_io::IoError),

    /// Configuration file could not be read
    #[error("failed to read config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML or has unknown keys
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized
    #[error("failed to serialize config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
