// Clip pipeline - Orchestrates the slice, compose, render and package use case

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::*;
use crate::ports::*;
use crate::utils::logging::ProgressReporter;

/// Pipeline knobs that come from configuration rather than the job itself
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub logo_height: u32,
    pub caption_font_size: u32,
    pub keep_scratch: bool,
    pub progress: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            logo_height: DEFAULT_LOGO_HEIGHT,
            caption_font_size: DEFAULT_CAPTION_FONT_SIZE,
            keep_scratch: false,
            progress: true,
        }
    }
}

/// One output part as it would be produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedPart {
    pub segment: Segment,
    pub file_name: String,
}

/// Dry-run result: what a run would produce for a source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobPlan {
    pub source: MediaInfo,
    pub clip_duration: u32,
    pub output_frame: FrameSize,
    pub parts: Vec<PlannedPart>,
    pub dropped_remainder: f64,
}

/// Interactor for the clip pipeline
pub struct ClipPipeline {
    probe_port: Arc<dyn MediaProbePort>,
    engine_port: Arc<dyn MediaEnginePort>,
    transcriber_port: Arc<dyn TranscriberPort>,
    archiver_port: Arc<dyn ArchiverPort>,
    workspace_port: Arc<dyn WorkspacePort>,
    settings: PipelineSettings,
}

impl ClipPipeline {
    /// Create new pipeline with injected ports
    pub fn new(
        probe_port: Arc<dyn MediaProbePort>,
        engine_port: Arc<dyn MediaEnginePort>,
        transcriber_port: Arc<dyn TranscriberPort>,
        archiver_port: Arc<dyn ArchiverPort>,
        workspace_port: Arc<dyn WorkspacePort>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            probe_port,
            engine_port,
            transcriber_port,
            archiver_port,
            workspace_port,
            settings,
        }
    }

    /// Probe the source and describe the parts a run would produce
    pub async fn plan(&self, config: &JobConfig) -> Result<JobPlan, DomainError> {
        ensure_inputs_exist(config)?;
        let source = self.probe_port.probe(config.source()).await?;

        let parts = partition(source.duration, config.clip_duration())
            .into_iter()
            .map(|segment| PlannedPart {
                file_name: part_file_name(config.base_title(), segment.index),
                segment,
            })
            .collect();

        let output_frame = if config.vertical_crop() {
            vertical_crop(source.frame_size()).output_size()
        } else {
            source.frame_size()
        }
        .even();

        Ok(JobPlan {
            dropped_remainder: dropped_remainder(source.duration, config.clip_duration()),
            clip_duration: config.clip_duration(),
            output_frame,
            parts,
            source,
        })
    }

    /// Run the whole job and write the archive to `archive_dest`.
    ///
    /// Any failure aborts the run; the scratch workspace is then left behind.
    pub async fn run(
        &self,
        config: &JobConfig,
        archive_dest: &Path,
    ) -> Result<JobReport, DomainError> {
        let started_at = Utc::now();
        let clock = Instant::now();

        ensure_inputs_exist(config)?;

        let source = self.probe_port.probe(config.source()).await?;
        info!(
            source = %source.path.display(),
            duration = source.duration,
            frame = %source.frame_size(),
            has_audio = source.has_audio,
            "Probed source video"
        );

        let segments = partition(source.duration, config.clip_duration());
        if segments.is_empty() {
            return Err(DomainError::BadArgs(format!(
                "Source is shorter than one clip ({:.3}s < {}s)",
                source.duration,
                config.clip_duration()
            )));
        }

        let remainder = dropped_remainder(source.duration, config.clip_duration());
        if remainder > 0.0 {
            warn!(
                remainder = %format!("{:.3}", remainder),
                "Trailing source shorter than one clip is dropped"
            );
        }

        let end_screen = match config.end_screen() {
            Some(path) => {
                let info = self.probe_port.probe(path).await?;
                Some(EndScreen {
                    path: info.path.clone(),
                    duration: info.duration,
                    has_audio: info.has_audio,
                })
            }
            None => None,
        };

        let workspace = self.workspace_port.create().await?;
        debug!(workspace = %workspace.root.display(), "Using scratch workspace");

        let mut progress = ProgressReporter::new(self.settings.progress);
        progress.start_operation(format!("Rendering {} clips", segments.len()));

        let total = segments.len();
        let mut artifacts = Vec::with_capacity(total);
        for segment in &segments {
            let composition = self
                .compose(config, &source, *segment, end_screen.as_ref(), &workspace)
                .await?;
            let dest = workspace
                .clips_dir
                .join(part_file_name(config.base_title(), segment.index));
            let artifact = self.engine_port.render(&composition, &dest).await?;

            artifacts.push(artifact);
            progress.update_progress(artifacts.len(), total, &format!("Rendered {}", segment));
        }
        progress.complete_operation(true);

        let package = self.archiver_port.package(&artifacts, archive_dest).await?;

        if self.settings.keep_scratch {
            info!(workspace = %workspace.root.display(), "Keeping scratch workspace");
        } else if let Err(e) = self.workspace_port.discard(&workspace).await {
            warn!(error = %e, "Failed to discard scratch workspace");
        }

        Ok(JobReport {
            package,
            artifacts,
            dropped_remainder: remainder,
            started_at,
            elapsed: clock.elapsed(),
        })
    }

    /// Apply crop, logo, audio, caption and end-screen steps in order
    async fn compose(
        &self,
        config: &JobConfig,
        source: &MediaInfo,
        segment: Segment,
        end_screen: Option<&EndScreen>,
        workspace: &Workspace,
    ) -> Result<Composition, DomainError> {
        let mut composition = Composition::new(source, segment);

        if config.vertical_crop() {
            composition = composition.with_crop(vertical_crop(source.frame_size()));
        }

        if let Some(logo) = config.logo() {
            composition = composition.with_logo(LogoOverlay {
                path: logo.to_path_buf(),
                height: self.settings.logo_height,
            });
        }

        composition =
            composition.with_audio(AudioPolicy::resolve(config.mute_audio(), config.music()));

        if config.add_captions() {
            let caption = self.caption_for(source, &segment, &composition, workspace).await?;
            composition = composition.with_caption(caption);
        }

        if let Some(end_screen) = end_screen {
            composition = composition.with_end_screen(end_screen.clone());
        }

        Ok(composition)
    }

    /// Transcribe the segment's source audio into a wrapped caption
    async fn caption_for(
        &self,
        source: &MediaInfo,
        segment: &Segment,
        composition: &Composition,
        workspace: &Workspace,
    ) -> Result<Caption, DomainError> {
        let font_size = self.settings.caption_font_size;

        if !source.has_audio {
            debug!(segment = %segment, "Source has no audio; caption left empty");
            return Ok(Caption {
                text: String::new(),
                font_size,
            });
        }

        let audio_path = workspace.root.join(audio_extract_name(segment.index));
        self.engine_port
            .extract_audio(&source.path, segment, &audio_path)
            .await?;
        let transcript = self.transcriber_port.transcribe(&audio_path).await?;
        if transcript.trim().is_empty() {
            debug!(segment = %segment, "Empty transcript");
        }

        Ok(Caption {
            text: wrap_caption(&transcript, composition.frame_size().width, font_size),
            font_size,
        })
    }
}

/// Every provided input must be an existing file
fn ensure_inputs_exist(config: &JobConfig) -> Result<(), DomainError> {
    let inputs = [
        Some(config.source()),
        config.logo(),
        config.music(),
        config.end_screen(),
    ];
    for path in inputs.into_iter().flatten() {
        if !path.is_file() {
            return Err(DomainError::FileNotFound(path.display().to_string()));
        }
    }
    Ok(())
}
