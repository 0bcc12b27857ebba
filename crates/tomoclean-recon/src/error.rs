//! Error types for tomoclean-recon

use thiserror::Error;

/// Errors that can occur on the reconstruction side of the pipeline
#[derive(Debug, Error)]
pub enum ReconError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] tomoclean_core::Error),

    /// Filter error
    #[error("filter error: {0}")]
    Filter(#[from] tomoclean_filter::FilterError),

    /// An injected reconstruction, stripe or ring engine failed
    #[error("{stage} failed: {message}")]
    Collaborator { stage: &'static str, message: String },
}

impl ReconError {
    /// Wrap a failure reported by an external engine.
    pub fn collaborator(stage: &'static str, message: impl Into<String>) -> Self {
        ReconError::Collaborator {
            stage,
            message: message.into(),
        }
    }
}

/// Result type for reconstruction-side operations
pub type ReconResult<T> = Result<T, ReconError>;
