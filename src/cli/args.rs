//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;
use clap_num::number_range;

use crate::domain::errors::DomainError;
use crate::domain::model::{
    JobConfig, DEFAULT_BASE_TITLE, MAX_CLIP_SECONDS, MIN_CLIP_SECONDS,
};

/// Default archive written by `run`
pub const DEFAULT_ARCHIVE: &str = "final_clips.zip";

fn parse_clip_duration(s: &str) -> Result<u32, String> {
    number_range(s, MIN_CLIP_SECONDS, MAX_CLIP_SECONDS)
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Source video (.mp4)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Logo image placed bottom-right (.png, .jpg)
    #[arg(long, value_name = "PATH")]
    pub logo: Option<PathBuf>,

    /// Music track replacing the source audio (.mp3)
    #[arg(long, value_name = "PATH")]
    pub music: Option<PathBuf>,

    /// Video appended to every clip (.mp4)
    #[arg(long, value_name = "PATH")]
    pub end_screen: Option<PathBuf>,

    /// Clip length in seconds (10-60)
    #[arg(short, long, default_value = "30", value_parser = parse_clip_duration)]
    pub duration: u32,

    /// Drop all audio; wins over --music
    #[arg(long)]
    pub mute: bool,

    /// Skip speech-to-text captions
    #[arg(long)]
    pub no_captions: bool,

    /// Keep the source aspect ratio instead of a 9:16 crop
    #[arg(long)]
    pub no_vertical: bool,

    /// Base name for output parts
    #[arg(short, long, default_value = DEFAULT_BASE_TITLE)]
    pub title: String,

    /// Archive to write
    #[arg(short, long, default_value = DEFAULT_ARCHIVE, value_name = "PATH")]
    pub output: PathBuf,

    /// Constant Rate Factor (0-51)
    #[arg(long)]
    pub crf: Option<u8>,

    /// Encoding preset
    #[arg(long)]
    pub preset: Option<String>,

    /// Leave the scratch workspace in place
    #[arg(long)]
    pub keep_scratch: bool,

    /// Print the job report as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub fn to_job_config(&self) -> Result<JobConfig, DomainError> {
        JobConfig::builder(self.input.clone())
            .logo(self.logo.clone())
            .music(self.music.clone())
            .end_screen(self.end_screen.clone())
            .clip_duration(self.duration)
            .mute_audio(self.mute)
            .add_captions(!self.no_captions)
            .vertical_crop(!self.no_vertical)
            .base_title(self.title.clone())
            .build()
    }
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Source video (.mp4)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Clip length in seconds (10-60)
    #[arg(short, long, default_value = "30", value_parser = parse_clip_duration)]
    pub duration: u32,

    /// Keep the source aspect ratio instead of a 9:16 crop
    #[arg(long)]
    pub no_vertical: bool,

    /// Base name for output parts
    #[arg(short, long, default_value = DEFAULT_BASE_TITLE)]
    pub title: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

impl PlanArgs {
    pub fn to_job_config(&self) -> Result<JobConfig, DomainError> {
        JobConfig::builder(self.input.clone())
            .clip_duration(self.duration)
            .vertical_crop(!self.no_vertical)
            .base_title(self.title.clone())
            .build()
    }
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Media file path
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
