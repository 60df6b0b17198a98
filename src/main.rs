//! Faceless Clipper CLI
//!
//! Turns one long video into short vertical clips ready for upload.
//!
//! # Usage
//!
//! ```bash
//! clipper run --input talk.mp4 --duration 30 --logo logo.png --identity me@example.com
//! clipper plan --input talk.mp4 --duration 45
//! clipper inspect --input talk.mp4 --json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use faceless_clipper::app::container::DefaultAppContainer;
use faceless_clipper::cli::{commands, Cli, Commands};
use faceless_clipper::config_initialization::initialize_configuration_hierarchy;
use faceless_clipper::utils::logging::init_logging;

/// Main entry point for the clipper application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let loaded = initialize_configuration_hierarchy(&cli)?;
    init_logging(&loaded.config.logging).context("Failed to initialize logging")?;
    faceless_clipper::init().context("Failed to initialize media libraries")?;

    match &loaded.source_file {
        Some(path) => info!(config = %path.display(), "Loaded configuration file"),
        None => debug!("No configuration file found; using defaults"),
    }
    debug!(
        env_overrides = loaded.env_overrides,
        cli_overrides = loaded.cli_overrides,
        "Configuration hierarchy initialized"
    );

    let container = DefaultAppContainer::new(&loaded.config);
    let identity = cli.identity.as_deref();

    // Execute the requested command
    match cli.command {
        Commands::Run(args) => commands::run(&container, identity, args).await,
        Commands::Plan(args) => commands::plan(&container, identity, args).await,
        Commands::Inspect(args) => commands::inspect(&container, identity, args).await,
    }
}
