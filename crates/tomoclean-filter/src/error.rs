//! Error types for tomoclean-filter
//!
//! Parameter and shape problems are reported through the core
//! [`tomoclean_core::Error`] taxonomy.

use thiserror::Error;

/// Errors that can occur during filtering operations
#[derive(Debug, Error)]
pub enum FilterError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] tomoclean_core::Error),
}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;
