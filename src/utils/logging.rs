//! Logging configuration and progress reporting

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::domain::errors::DomainError;
use crate::error::{ClipperError, ClipperResult};
use crate::utils::Utils;

/// Logging configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level
    pub level: LogLevel,
    /// Output format
    pub format: LogFormat,
    /// Log per-segment progress
    pub progress: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            progress: true,
        }
    }
}

/// Log level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    /// Directive understood by `EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// Single-line text format
    Compact,
    /// JSON lines for structured logging
    Json,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> ClipperResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = match config.format {
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    result.map_err(|e| ClipperError::LoggingInitError {
        message: e.to_string(),
    })
}

/// Progress reporter for long-running operations
pub struct ProgressReporter {
    enabled: bool,
    current_operation: Option<String>,
    start_time: Option<Instant>,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            current_operation: None,
            start_time: None,
        }
    }

    /// Start a new operation
    pub fn start_operation(&mut self, operation: impl Into<String>) {
        let operation = operation.into();
        if self.enabled {
            tracing::info!(operation = %operation, "Starting");
        }
        self.current_operation = Some(operation);
        self.start_time = Some(Instant::now());
    }

    /// Report that `completed` of `total` units are done
    pub fn update_progress(&self, completed: usize, total: usize, description: &str) {
        if !self.enabled {
            return;
        }

        let percent = if total == 0 {
            100.0
        } else {
            (completed as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        };
        let elapsed = self.elapsed();
        let eta = Utils::estimate_remaining_time(completed as u64, total as u64, elapsed)
            .map(Utils::format_duration);

        tracing::info!(
            completed,
            total,
            percent = %format!("{:.0}", percent),
            eta = eta.as_deref().unwrap_or("-"),
            "{}",
            description
        );
    }

    /// Complete the current operation
    pub fn complete_operation(&mut self, success: bool) {
        if let Some(operation) = self.current_operation.take() {
            let elapsed = self.elapsed();
            if success {
                tracing::info!(
                    operation = %operation,
                    elapsed = %Utils::format_duration(elapsed),
                    "Completed"
                );
            } else {
                tracing::error!(
                    operation = %operation,
                    elapsed = %Utils::format_duration(elapsed),
                    "Failed"
                );
            }
        }
        self.start_time = None;
    }

    /// Time since the current operation started
    pub fn elapsed(&self) -> Duration {
        self.start_time
            .map(|start| start.elapsed())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::parse(" warn ").unwrap(), LogLevel::Warn);
        assert!(LogLevel::parse("loud").is_err());
    }

    #[test]
    fn test_logging_config_deserializes_lowercase() {
        let config: LoggingConfig = toml::from_str("level = \"debug\"\nformat = \"json\"").unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.progress);
    }

    #[test]
    fn test_progress_reporter_lifecycle() {
        let mut reporter = ProgressReporter::new(false);
        assert_eq!(reporter.elapsed(), Duration::ZERO);

        reporter.start_operation("render");
        reporter.update_progress(1, 3, "segment done");
        reporter.complete_operation(true);
        assert_eq!(reporter.elapsed(), Duration::ZERO);
    }
}
