//! FFmpeg execution adapter
//!
//! Renders compositions by driving the `ffmpeg` executable with a filter graph.

pub mod filtergraph;

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

use filtergraph::{build_extract_audio_args, build_render_args, RenderInputs};

/// Lines of ffmpeg stderr kept in error messages
const STDERR_TAIL_LINES: usize = 20;

/// FFmpeg-based execution adapter
pub struct FFmpegAdapter {
    program: String,
    encoding: EncodingSettings,
    font_file: Option<PathBuf>,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter
    pub fn new(program: impl Into<String>, encoding: EncodingSettings) -> Self {
        Self {
            program: program.into(),
            encoding,
            font_file: None,
        }
    }

    /// Use a specific font file for captions
    pub fn with_font_file(mut self, font_file: Option<PathBuf>) -> Self {
        self.font_file = font_file;
        self
    }

    /// Run ffmpeg to completion, mapping failure to a processing error
    async fn run(&self, args: &[String]) -> Result<(), DomainError> {
        debug!(program = %self.program, args = ?args, "Running ffmpeg");

        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::ProcessingError(format!("Failed to launch {}: {}", self.program, e))
            })?;

        if !output.status.success() {
            return Err(DomainError::ProcessingError(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr_tail(&output.stderr)
            )));
        }

        Ok(())
    }
}

/// Last lines of a child's stderr
pub(crate) fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|line| !line.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

/// Delete a caption text file; the clip is already rendered either way
async fn remove_caption_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        debug!(error = %e, path = %path.display(), "Failed to remove caption file");
    }
}

#[async_trait]
impl MediaEnginePort for FFmpegAdapter {
    async fn extract_audio(
        &self,
        source: &Path,
        segment: &Segment,
        dest: &Path,
    ) -> Result<(), DomainError> {
        let args = build_extract_audio_args(source, segment, dest);
        self.run(&args).await?;
        debug!(segment = %segment, dest = %dest.display(), "Extracted segment audio");
        Ok(())
    }

    async fn render(
        &self,
        composition: &Composition,
        dest: &Path,
    ) -> Result<ClipArtifact, DomainError> {
        let caption_file = match &composition.caption {
            Some(caption) if !caption.is_blank() => {
                let path = dest.with_extension("caption.txt");
                tokio::fs::write(&path, caption.text.as_bytes())
                    .await
                    .map_err(|e| {
                        DomainError::FsFail(format!(
                            "Failed to write caption file {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                Some(path)
            }
            _ => None,
        };

        let inputs = RenderInputs {
            caption_file: caption_file.as_deref(),
            font_file: self.font_file.as_deref(),
        };
        let args = build_render_args(composition, dest, &inputs, &self.encoding);
        let rendered = self.run(&args).await;

        if let Some(path) = &caption_file {
            remove_caption_file(path).await;
        }
        rendered?;

        let file_name = dest
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or_else(|| {
                DomainError::BadArgs(format!("Output path has no file name: {}", dest.display()))
            })?;

        info!(
            segment = %composition.segment,
            output = %dest.display(),
            duration = composition.output_duration(),
            "Rendered clip"
        );

        Ok(ClipArtifact {
            path: dest.to_path_buf(),
            file_name,
            part_number: composition.segment.part_number(),
            duration: composition.output_duration(),
            video_codec: self.encoding.video_codec.clone(),
            audio_codec: composition
                .has_audio_output()
                .then(|| self.encoding.audio_codec.clone()),
        })
    }
}
