//! Error handling module for the clipper library boundary

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Main error type for clipper operations
#[derive(Error, Debug)]
pub enum ClipperError {
    /// Error raised inside the pipeline or one of its collaborators
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// FFmpeg initialization error
    #[error("Failed to initialize FFmpeg: {message}")]
    FFmpegInitError { message: String },

    /// Logging subscriber could not be installed
    #[error("Failed to initialize logging: {message}")]
    LoggingInitError { message: String },
}

/// Result type alias for clipper operations
pub type ClipperResult<T> = std::result::Result<T, ClipperError>;
