// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::errors::DomainError;
use crate::domain::rules::sanitize_base_title;

/// Shortest clip duration accepted, in seconds
pub const MIN_CLIP_SECONDS: u32 = 10;
/// Longest clip duration accepted, in seconds
pub const MAX_CLIP_SECONDS: u32 = 60;
/// Clip duration used when none is given
pub const DEFAULT_CLIP_SECONDS: u32 = 30;
/// Base output name used when none is given
pub const DEFAULT_BASE_TITLE: &str = "MyClip";
/// Logo overlay height in pixels
pub const DEFAULT_LOGO_HEIGHT: u32 = 50;
/// Caption font size in pixels
pub const DEFAULT_CAPTION_FONT_SIZE: u32 = 40;

/// Kinds of input asset the pipeline accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    SourceVideo,
    Logo,
    Music,
    EndScreen,
}

impl AssetKind {
    /// File extensions accepted for this kind (lower case)
    pub fn accepted_extensions(&self) -> &'static [&'static str] {
        match self {
            AssetKind::SourceVideo | AssetKind::EndScreen => &["mp4"],
            AssetKind::Logo => &["png", "jpg", "jpeg"],
            AssetKind::Music => &["mp3"],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::SourceVideo => "source video",
            AssetKind::Logo => "logo",
            AssetKind::Music => "music",
            AssetKind::EndScreen => "end screen",
        }
    }

    /// Check that a path carries an accepted extension
    pub fn validate(&self, path: &Path) -> Result<(), DomainError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension {
            Some(ext) if self.accepted_extensions().contains(&ext.as_str()) => Ok(()),
            _ => Err(DomainError::InvalidFormat(format!(
                "{} '{}' must be one of: {}",
                self.label(),
                path.display(),
                self.accepted_extensions().join(", ")
            ))),
        }
    }
}

/// Immutable bundle of everything one run needs.
///
/// Built once through [`JobConfigBuilder`]; the pipeline only ever reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct JobConfig {
    source: PathBuf,
    logo: Option<PathBuf>,
    music: Option<PathBuf>,
    end_screen: Option<PathBuf>,
    clip_duration: u32,
    mute_audio: bool,
    add_captions: bool,
    vertical_crop: bool,
    base_title: String,
}

impl JobConfig {
    /// Start building a configuration for the given source video
    pub fn builder(source: impl Into<PathBuf>) -> JobConfigBuilder {
        JobConfigBuilder::new(source)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn logo(&self) -> Option<&Path> {
        self.logo.as_deref()
    }

    pub fn music(&self) -> Option<&Path> {
        self.music.as_deref()
    }

    pub fn end_screen(&self) -> Option<&Path> {
        self.end_screen.as_deref()
    }

    /// Clip duration in whole seconds
    pub fn clip_duration(&self) -> u32 {
        self.clip_duration
    }

    pub fn mute_audio(&self) -> bool {
        self.mute_audio
    }

    pub fn add_captions(&self) -> bool {
        self.add_captions
    }

    pub fn vertical_crop(&self) -> bool {
        self.vertical_crop
    }

    /// Sanitized base name used for every output part
    pub fn base_title(&self) -> &str {
        &self.base_title
    }
}

/// Builder for [`JobConfig`] carrying the form defaults
#[derive(Debug, Clone)]
pub struct JobConfigBuilder {
    source: PathBuf,
    logo: Option<PathBuf>,
    music: Option<PathBuf>,
    end_screen: Option<PathBuf>,
    clip_duration: u32,
    mute_audio: bool,
    add_captions: bool,
    vertical_crop: bool,
    base_title: String,
}

impl JobConfigBuilder {
    fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            logo: None,
            music: None,
            end_screen: None,
            clip_duration: DEFAULT_CLIP_SECONDS,
            mute_audio: false,
            add_captions: true,
            vertical_crop: true,
            base_title: DEFAULT_BASE_TITLE.to_string(),
        }
    }

    pub fn logo(mut self, logo: Option<PathBuf>) -> Self {
        self.logo = logo;
        self
    }

    pub fn music(mut self, music: Option<PathBuf>) -> Self {
        self.music = music;
        self
    }

    pub fn end_screen(mut self, end_screen: Option<PathBuf>) -> Self {
        self.end_screen = end_screen;
        self
    }

    pub fn clip_duration(mut self, seconds: u32) -> Self {
        self.clip_duration = seconds;
        self
    }

    pub fn mute_audio(mut self, mute: bool) -> Self {
        self.mute_audio = mute;
        self
    }

    pub fn add_captions(mut self, captions: bool) -> Self {
        self.add_captions = captions;
        self
    }

    pub fn vertical_crop(mut self, vertical: bool) -> Self {
        self.vertical_crop = vertical;
        self
    }

    pub fn base_title(mut self, title: impl Into<String>) -> Self {
        self.base_title = title.into();
        self
    }

    /// Validate and freeze the configuration
    pub fn build(self) -> Result<JobConfig, DomainError> {
        if !(MIN_CLIP_SECONDS..=MAX_CLIP_SECONDS).contains(&self.clip_duration) {
            return Err(DomainError::BadArgs(format!(
                "Clip duration must be between {} and {} seconds, got {}",
                MIN_CLIP_SECONDS, MAX_CLIP_SECONDS, self.clip_duration
            )));
        }

        AssetKind::SourceVideo.validate(&self.source)?;
        if let Some(logo) = &self.logo {
            AssetKind::Logo.validate(logo)?;
        }
        if let Some(music) = &self.music {
            AssetKind::Music.validate(music)?;
        }
        if let Some(end_screen) = &self.end_screen {
            AssetKind::EndScreen.validate(end_screen)?;
        }

        let base_title = sanitize_base_title(&self.base_title)?;

        Ok(JobConfig {
            source: self.source,
            logo: self.logo,
            music: self.music,
            end_screen: self.end_screen,
            clip_duration: self.clip_duration,
            mute_audio: self.mute_audio,
            add_captions: self.add_captions,
            vertical_crop: self.vertical_crop,
            base_title,
        })
    }
}

/// A fixed-duration window of the source video, times in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub index: usize,
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// One-based part number used in output names
    pub fn part_number(&self) -> usize {
        self.index + 1
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Part {} [{:.3}s, {:.3}s)",
            self.part_number(),
            self.start,
            self.end
        )
    }
}

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Round both sides down to even values, as 4:2:0 encoders require
    pub fn even(&self) -> Self {
        Self {
            width: (self.width & !1).max(2),
            height: (self.height & !1).max(2),
        }
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Crop window in source pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn output_size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }
}

/// Probed facts about a media file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaInfo {
    pub path: PathBuf,
    pub format: String,
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub frame_rate: f64,
    pub has_audio: bool,
    pub file_size: u64,
}

impl MediaInfo {
    pub fn frame_size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }
}

/// Logo image scaled to a fixed height and anchored bottom-right
#[derive(Debug, Clone, PartialEq)]
pub struct LogoOverlay {
    pub path: PathBuf,
    pub height: u32,
}

/// Audio carried by a rendered clip
#[derive(Debug, Clone, PartialEq)]
pub enum AudioTrack {
    /// Source audio left untouched
    Original,
    /// No audio track at all
    Muted,
    /// Source audio replaced by a music track fitted to the clip length
    Music(PathBuf),
}

/// A single static caption shown bottom-center for the whole segment
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub font_size: u32,
}

impl Caption {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// End-screen video appended after the segment
#[derive(Debug, Clone, PartialEq)]
pub struct EndScreen {
    pub path: PathBuf,
    pub duration: f64,
    pub has_audio: bool,
}

/// Per-segment render description.
///
/// Each pipeline step consumes a composition and returns a new one; the media
/// engine only sees the final value.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub source: PathBuf,
    pub source_has_audio: bool,
    pub segment: Segment,
    pub source_frame: FrameSize,
    pub crop: Option<CropRect>,
    pub logo: Option<LogoOverlay>,
    pub audio: AudioTrack,
    pub caption: Option<Caption>,
    pub end_screen: Option<EndScreen>,
}

impl Composition {
    /// Plain re-encode of one source window with its original audio
    pub fn new(source: &MediaInfo, segment: Segment) -> Self {
        Self {
            source: source.path.clone(),
            source_has_audio: source.has_audio,
            segment,
            source_frame: source.frame_size(),
            crop: None,
            logo: None,
            audio: AudioTrack::Original,
            caption: None,
            end_screen: None,
        }
    }

    pub fn with_crop(self, crop: CropRect) -> Self {
        Self {
            crop: Some(crop),
            ..self
        }
    }

    pub fn with_logo(self, logo: LogoOverlay) -> Self {
        Self {
            logo: Some(logo),
            ..self
        }
    }

    pub fn with_audio(self, audio: AudioTrack) -> Self {
        Self { audio, ..self }
    }

    pub fn with_caption(self, caption: Caption) -> Self {
        Self {
            caption: Some(caption),
            ..self
        }
    }

    pub fn with_end_screen(self, end_screen: EndScreen) -> Self {
        Self {
            end_screen: Some(end_screen),
            ..self
        }
    }

    /// Frame size after cropping
    pub fn frame_size(&self) -> FrameSize {
        self.crop
            .map(|crop| crop.output_size())
            .unwrap_or(self.source_frame)
    }

    /// Whether the rendered clip carries an audio track
    pub fn has_audio_output(&self) -> bool {
        match self.audio {
            AudioTrack::Original => self.source_has_audio,
            AudioTrack::Muted => false,
            AudioTrack::Music(_) => true,
        }
    }

    /// Segment duration plus any appended end-screen
    pub fn output_duration(&self) -> f64 {
        self.segment.duration()
            + self
                .end_screen
                .as_ref()
                .map(|end| end.duration)
                .unwrap_or(0.0)
    }
}

/// Codec settings applied to every rendered clip
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingSettings {
    pub video_codec: String,
    pub audio_codec: String,
    pub preset: String,
    pub crf: u8,
    pub threads: usize,
}

impl Default for EncodingSettings {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "medium".to_string(),
            crf: 23,
            threads: num_cpus::get(),
        }
    }
}

/// Rendered output file for one segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub part_number: usize,
    pub duration: f64,
    pub video_codec: String,
    pub audio_codec: Option<String>,
}

/// Archive bundling every clip artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputPackage {
    pub path: PathBuf,
    pub entries: Vec<String>,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub package: OutputPackage,
    pub artifacts: Vec<ClipArtifact>,
    pub dropped_remainder: f64,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}
