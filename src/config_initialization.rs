//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::adapters::toml_config::{ClipperConfig, TomlConfigAdapter};
use crate::cli::{Cli, Commands};

/// Configuration after every layer has been applied
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: ClipperConfig,
    pub source_file: Option<PathBuf>,
    pub env_overrides: usize,
    pub cli_overrides: usize,
}

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<LoadedConfig> {
    initialize_with_env(cli, |key| std::env::var(key).ok())
}

/// Same as [`initialize_configuration_hierarchy`] with an injectable environment
pub fn initialize_with_env<F>(cli: &Cli, lookup: F) -> Result<LoadedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    // Step 1 + 2: defaults, then the first config file found
    let (mut config, source_file) = load_config_file(cli)?;

    // Step 3: environment
    let env_overrides = TomlConfigAdapter::apply_env_overrides(&mut config, lookup)
        .context("Invalid environment override")?;

    // Step 4: command line
    let cli_overrides = apply_cli_configuration_overrides(&mut config, cli);

    TomlConfigAdapter::validate(&config).context("Invalid configuration")?;

    Ok(LoadedConfig {
        config,
        source_file,
        env_overrides,
        cli_overrides,
    })
}

/// Load configuration from file; an explicit `--config` must exist
fn load_config_file(cli: &Cli) -> Result<(ClipperConfig, Option<PathBuf>)> {
    if let Some(path) = &cli.config {
        let config = TomlConfigAdapter::load_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?;
        return Ok((config, Some(path.clone())));
    }

    for path in TomlConfigAdapter::default_search_paths() {
        if path.is_file() {
            let config = TomlConfigAdapter::load_file(&path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            return Ok((config, Some(path)));
        }
    }

    Ok((ClipperConfig::default(), None))
}

/// Apply CLI argument overrides to configuration
fn apply_cli_configuration_overrides(config: &mut ClipperConfig, cli: &Cli) -> usize {
    let mut cli_overrides = 0;

    if let Some(level) = cli.log_level {
        config.logging.level = level;
        cli_overrides += 1;
    }
    if let Some(format) = cli.log_format {
        config.logging.format = format;
        cli_overrides += 1;
    }

    if let Commands::Run(args) = &cli.command {
        if let Some(crf) = args.crf {
            config.encoding.crf = crf;
            cli_overrides += 1;
        }
        if let Some(preset) = &args.preset {
            config.encoding.preset = preset.clone();
            cli_overrides += 1;
        }
        if args.keep_scratch {
            config.workspace.keep_scratch = true;
            cli_overrides += 1;
        }
    }

    cli_overrides
}
