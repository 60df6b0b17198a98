//! Faceless Clipper Library
//!
//! Slices a long source video into fixed-length clips, optionally cropped to
//! 9:16 and decorated with a logo, music, speech-to-text captions and an
//! end-screen, then bundles the clips into one ZIP archive.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{JobConfig, JobReport, MediaInfo, Segment};
pub use error::{ClipperError, ClipperResult};

/// Initialize the media libraries used for probing
pub fn init() -> ClipperResult<()> {
    ffmpeg_next::init().map_err(|e| ClipperError::FFmpegInitError {
        message: e.to_string(),
    })?;

    Ok(())
}
