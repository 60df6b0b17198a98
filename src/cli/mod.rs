//! CLI module for the clipper
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::utils::logging::{LogFormat, LogLevel};

pub mod args;
pub mod commands;

/// Faceless Clipper
///
/// Slices a long video into fixed-length vertical clips with optional logo,
/// music, captions and end-screen, and bundles them into one ZIP archive.
#[derive(Parser, Debug)]
#[command(name = "clipper")]
#[command(about = "Slice long videos into short vertical clips, captioned and branded")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: clipper.toml or config/clipper.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Logging output format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Identity checked against the configured allow-list
    #[arg(long, global = true, env = "CLIPPER_IDENTITY")]
    pub identity: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Slice, compose and package a source video
    Run(args::RunArgs),
    /// Show the parts a run would produce without rendering
    Plan(args::PlanArgs),
    /// Inspect media file information
    Inspect(args::InspectArgs),
}
