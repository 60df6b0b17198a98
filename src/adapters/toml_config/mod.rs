// TOML config adapter - Configuration management using TOML files

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::domain::model::{EncodingSettings, DEFAULT_CAPTION_FONT_SIZE, DEFAULT_LOGO_HEIGHT};
use crate::utils::logging::{LogLevel, LoggingConfig};

/// x264 presets accepted in `[encoding] preset`
const VALID_PRESETS: &[&str] = &[
    "ultrafast",
    "superfast",
    "veryfast",
    "faster",
    "fast",
    "medium",
    "slow",
    "slower",
    "veryslow",
    "placebo",
];

/// Complete clipper configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipperConfig {
    pub access: AccessConfig,
    pub encoding: EncodingConfig,
    pub captions: CaptionsConfig,
    pub overlay: OverlayConfig,
    pub tools: ToolsConfig,
    pub workspace: WorkspaceConfig,
    pub logging: LoggingConfig,
}

/// Identities allowed through the access gate
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    pub allowed_identities: Vec<String>,
}

/// Codec pair and x264 tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    pub video_codec: String,
    pub audio_codec: String,
    pub preset: String,
    pub crf: u8,
    /// Encoder threads; 0 picks the number of CPUs
    pub threads: usize,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "medium".to_string(),
            crf: 23,
            threads: 0,
        }
    }
}

impl EncodingConfig {
    pub fn to_settings(&self) -> EncodingSettings {
        let threads = if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        };
        EncodingSettings {
            video_codec: self.video_codec.clone(),
            audio_codec: self.audio_codec.clone(),
            preset: self.preset.clone(),
            crf: self.crf,
            threads,
        }
    }
}

/// Speech-to-text and caption rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionsConfig {
    /// Whisper executable
    pub program: String,
    /// Whisper model name
    pub model: String,
    /// Language hint; auto-detected when unset
    pub language: Option<String>,
    pub font_size: u32,
    /// Font file for drawtext; fontconfig default when unset
    pub font_file: Option<PathBuf>,
}

impl Default for CaptionsConfig {
    fn default() -> Self {
        Self {
            program: "whisper".to_string(),
            model: "base".to_string(),
            language: None,
            font_size: DEFAULT_CAPTION_FONT_SIZE,
            font_file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub logo_height: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            logo_height: DEFAULT_LOGO_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Parent directory for scratch workspaces; system temp dir when unset
    pub root: Option<PathBuf>,
    /// Leave the scratch workspace in place after a successful run
    pub keep_scratch: bool,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Default locations searched when no path is given
    pub fn default_search_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("clipper.toml"),
            PathBuf::from("config").join("clipper.toml"),
        ]
    }

    /// Parse configuration from a TOML string
    pub fn parse(toml_content: &str) -> Result<ClipperConfig, DomainError> {
        toml::from_str(toml_content)
            .map_err(|e| DomainError::ConfigError(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<ClipperConfig, DomainError> {
        if !path.exists() {
            return Err(DomainError::FileNotFound(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::FsFail(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        Self::parse(&content)
    }

    /// Apply `CLIPPER_*` overrides; returns how many were applied
    pub fn apply_env_overrides<F>(
        config: &mut ClipperConfig,
        lookup: F,
    ) -> Result<usize, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;

        if let Some(value) = lookup("CLIPPER_ALLOWED_IDENTITY") {
            config.access.allowed_identities = value
                .split(',')
                .map(|identity| identity.trim().to_string())
                .filter(|identity| !identity.is_empty())
                .collect();
            applied += 1;
        }
        if let Some(value) = lookup("CLIPPER_FFMPEG") {
            config.tools.ffmpeg = value;
            applied += 1;
        }
        if let Some(value) = lookup("CLIPPER_WHISPER") {
            config.captions.program = value;
            applied += 1;
        }
        if let Some(value) = lookup("CLIPPER_WHISPER_MODEL") {
            config.captions.model = value;
            applied += 1;
        }
        if let Some(value) = lookup("CLIPPER_CRF") {
            config.encoding.crf = value
                .trim()
                .parse()
                .map_err(|e| DomainError::ConfigError(format!("Invalid CLIPPER_CRF: {}", e)))?;
            applied += 1;
        }
        if let Some(value) = lookup("CLIPPER_LOG_LEVEL") {
            config.logging.level = LogLevel::parse(&value)?;
            applied += 1;
        }
        if let Some(value) = lookup("CLIPPER_KEEP_SCRATCH") {
            config.workspace.keep_scratch = value.trim().parse().map_err(|e| {
                DomainError::ConfigError(format!("Invalid CLIPPER_KEEP_SCRATCH: {}", e))
            })?;
            applied += 1;
        }

        Ok(applied)
    }

    /// Validate configuration values
    pub fn validate(config: &ClipperConfig) -> Result<(), DomainError> {
        if config.encoding.crf > 51 {
            return Err(DomainError::ConfigError(
                "CRF value cannot exceed 51".to_string(),
            ));
        }
        if !VALID_PRESETS.contains(&config.encoding.preset.as_str()) {
            return Err(DomainError::ConfigError(format!(
                "Unknown encoding preset: {}",
                config.encoding.preset
            )));
        }
        if config.encoding.video_codec.trim().is_empty()
            || config.encoding.audio_codec.trim().is_empty()
        {
            return Err(DomainError::ConfigError(
                "Codec names cannot be empty".to_string(),
            ));
        }
        if config.overlay.logo_height == 0 {
            return Err(DomainError::ConfigError(
                "Logo height must be positive".to_string(),
            ));
        }
        if config.captions.font_size == 0 {
            return Err(DomainError::ConfigError(
                "Caption font size must be positive".to_string(),
            ));
        }
        if config.tools.ffmpeg.trim().is_empty() || config.captions.program.trim().is_empty() {
            return Err(DomainError::ConfigError(
                "Tool paths cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_form_defaults() {
        let config = ClipperConfig::default();
        assert_eq!(config.encoding.video_codec, "libx264");
        assert_eq!(config.encoding.audio_codec, "aac");
        assert_eq!(config.captions.model, "base");
        assert_eq!(config.captions.font_size, 40);
        assert_eq!(config.overlay.logo_height, 50);
        assert!(config.access.allowed_identities.is_empty());
        assert!(!config.workspace.keep_scratch);
        assert!(TomlConfigAdapter::validate(&config).is_ok());
    }

    #[test]
    fn test_parse_partial_file_keeps_defaults() {
        let config = TomlConfigAdapter::parse(
            r#"
            [access]
            allowed_identities = ["me@example.com"]

            [encoding]
            crf = 18
            preset = "slow"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.access.allowed_identities, vec!["me@example.com"]);
        assert_eq!(config.encoding.crf, 18);
        assert_eq!(config.encoding.preset, "slow");
        assert_eq!(config.encoding.video_codec, "libx264");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.tools.ffmpeg, "ffmpeg");
    }

    #[test]
    fn test_parse_rejects_malformed_toml() {
        let result = TomlConfigAdapter::parse("[encoding\ncrf = ");
        assert!(matches!(result, Err(DomainError::ConfigError(_))));
    }

    #[test]
    fn test_load_file_reads_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clipper.toml");
        std::fs::write(&path, "[workspace]\nkeep_scratch = true\n").unwrap();

        let loaded = TomlConfigAdapter::load_file(&path).unwrap();
        assert!(loaded.workspace.keep_scratch);

        let missing = TomlConfigAdapter::load_file(&dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(DomainError::FileNotFound(_))));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("CLIPPER_ALLOWED_IDENTITY", "a@example.com, b@example.com,"),
            ("CLIPPER_FFMPEG", "/opt/ffmpeg/bin/ffmpeg"),
            ("CLIPPER_KEEP_SCRATCH", "true"),
            ("CLIPPER_LOG_LEVEL", "trace"),
        ]);
        let mut config = ClipperConfig::default();

        let applied = TomlConfigAdapter::apply_env_overrides(&mut config, |key| {
            env.get(key).map(|value| value.to_string())
        })
        .unwrap();

        assert_eq!(applied, 4);
        assert_eq!(
            config.access.allowed_identities,
            vec!["a@example.com", "b@example.com"]
        );
        assert_eq!(config.tools.ffmpeg, "/opt/ffmpeg/bin/ffmpeg");
        assert!(config.workspace.keep_scratch);
        assert_eq!(config.logging.level, LogLevel::Trace);
    }

    #[test]
    fn test_env_override_rejects_bad_values() {
        let mut config = ClipperConfig::default();
        let result = TomlConfigAdapter::apply_env_overrides(&mut config, |key| {
            (key == "CLIPPER_CRF").then(|| "high".to_string())
        });
        assert!(matches!(result, Err(DomainError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ClipperConfig::default();
        config.encoding.crf = 60;
        assert!(TomlConfigAdapter::validate(&config).is_err());

        let mut config = ClipperConfig::default();
        config.encoding.preset = "warp".to_string();
        assert!(TomlConfigAdapter::validate(&config).is_err());

        let mut config = ClipperConfig::default();
        config.overlay.logo_height = 0;
        assert!(TomlConfigAdapter::validate(&config).is_err());
    }
}
