// Inspect interactor - Orchestrates media file inspection use case

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::vertical_crop;
use crate::ports::*;
use crate::utils::time::format_timestamp;
use crate::utils::Utils;

/// Result of inspecting one media file
#[derive(Debug, Clone)]
pub struct InspectResponse {
    pub media_info: MediaInfo,
    pub summary: String,
}

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn MediaProbePort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(probe_port: Arc<dyn MediaProbePort>) -> Self {
        Self { probe_port }
    }

    /// Probe a file and render a summary as text or JSON
    pub async fn execute(&self, path: &Path, json: bool) -> Result<InspectResponse, DomainError> {
        if !path.is_file() {
            return Err(DomainError::FileNotFound(path.display().to_string()));
        }

        let media_info = self.probe_port.probe(path).await?;
        info!(path = %path.display(), "Media file inspected");

        let summary = if json {
            Self::format_as_json(&media_info)?
        } else {
            Self::format_as_text(&media_info)
        };

        Ok(InspectResponse {
            media_info,
            summary,
        })
    }

    /// Format media info as JSON
    fn format_as_json(media_info: &MediaInfo) -> Result<String, DomainError> {
        serde_json::to_string_pretty(media_info)
            .map_err(|e| DomainError::ProcessingError(format!("JSON serialization failed: {}", e)))
    }

    /// Format media info as text
    fn format_as_text(media_info: &MediaInfo) -> String {
        let crop = vertical_crop(media_info.frame_size());
        let mut out = String::new();
        out.push_str(&format!("File:        {}\n", media_info.path.display()));
        out.push_str(&format!("Format:      {}\n", media_info.format));
        out.push_str(&format!(
            "Duration:    {} ({:.3}s)\n",
            format_timestamp(media_info.duration),
            media_info.duration
        ));
        out.push_str(&format!("Frame:       {}\n", media_info.frame_size()));
        out.push_str(&format!("Frame rate:  {:.3} fps\n", media_info.frame_rate));
        out.push_str(&format!(
            "Audio:       {}\n",
            if media_info.has_audio { "yes" } else { "no" }
        ));
        out.push_str(&format!(
            "Size:        {}\n",
            Utils::format_file_size(media_info.file_size)
        ));
        out.push_str(&format!(
            "9:16 crop:   {} at x={}",
            crop.output_size(),
            crop.x
        ));
        out
    }
}
