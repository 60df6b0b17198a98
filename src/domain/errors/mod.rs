// Domain errors - Error types for the domain layer

use std::fmt;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Invalid arguments provided
    BadArgs(String),
    /// File not found
    FileNotFound(String),
    /// Asset has a format the pipeline does not accept
    InvalidFormat(String),
    /// Identity rejected by the access gate
    PermissionDenied(String),
    /// Media probing failed
    ProbeFail(String),
    /// Media engine decode/encode failure
    ProcessingError(String),
    /// Speech-to-text failure
    TranscriptionFailed(String),
    /// Archive creation failure
    ArchiveFailed(String),
    /// File system failure
    FsFail(String),
    /// Configuration could not be loaded or is invalid
    ConfigError(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FileNotFound(msg) => write!(f, "File not found: {}", msg),
            DomainError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            DomainError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            DomainError::ProbeFail(msg) => write!(f, "Probe failed: {}", msg),
            DomainError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            DomainError::TranscriptionFailed(msg) => write!(f, "Transcription failed: {}", msg),
            DomainError::ArchiveFailed(msg) => write!(f, "Archive failed: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::FsFail(err.to_string())
    }
}
