//! Whisper transcription adapter
//!
//! Runs the Whisper command-line tool on an audio file and reads back the
//! plain-text transcript it writes next to the input.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::adapters::exec_ffmpeg::stderr_tail;
use crate::domain::errors::*;
use crate::ports::*;

/// Whisper CLI transcriber
pub struct WhisperCliTranscriber {
    program: String,
    model: String,
    language: Option<String>,
}

impl WhisperCliTranscriber {
    pub fn new(program: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            model: model.into(),
            language: None,
        }
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    /// Arguments for one transcription run
    pub fn build_args(&self, audio: &Path, output_dir: &Path) -> Vec<String> {
        let mut args = vec![
            audio.display().to_string(),
            "--model".to_string(),
            self.model.clone(),
            "--output_format".to_string(),
            "txt".to_string(),
            "--output_dir".to_string(),
            output_dir.display().to_string(),
            "--fp16".to_string(),
            "False".to_string(),
            "--verbose".to_string(),
            "False".to_string(),
        ];
        if let Some(language) = &self.language {
            args.push("--language".to_string());
            args.push(language.clone());
        }
        args
    }

    /// Path of the transcript Whisper writes for `audio`
    pub fn transcript_path(audio: &Path, output_dir: &Path) -> PathBuf {
        let stem = audio
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "audio".to_string());
        output_dir.join(format!("{}.txt", stem))
    }
}

/// Collapse a multi-line transcript into one line of text
pub fn normalize_transcript(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[async_trait]
impl TranscriberPort for WhisperCliTranscriber {
    async fn transcribe(&self, audio: &Path) -> Result<String, DomainError> {
        if !audio.exists() {
            return Err(DomainError::FileNotFound(audio.display().to_string()));
        }

        let output_dir = audio
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let args = self.build_args(audio, &output_dir);
        debug!(program = %self.program, args = ?args, "Running whisper");

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                DomainError::TranscriptionFailed(format!(
                    "Failed to launch {}: {}",
                    self.program, e
                ))
            })?;

        if !output.status.success() {
            return Err(DomainError::TranscriptionFailed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr_tail(&output.stderr)
            )));
        }

        let transcript_path = Self::transcript_path(audio, &output_dir);
        let raw = tokio::fs::read_to_string(&transcript_path)
            .await
            .map_err(|e| {
                DomainError::TranscriptionFailed(format!(
                    "Missing transcript {}: {}",
                    transcript_path.display(),
                    e
                ))
            })?;

        let text = normalize_transcript(&raw);
        info!(
            audio = %audio.display(),
            characters = text.len(),
            "Transcribed segment audio"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args_with_language() {
        let transcriber =
            WhisperCliTranscriber::new("whisper", "base").with_language(Some("en".to_string()));
        let args = transcriber.build_args(Path::new("/s/audio_0.wav"), Path::new("/s"));

        assert_eq!(args[0], "/s/audio_0.wav");
        assert!(args.windows(2).any(|w| w == ["--model", "base"]));
        assert!(args.windows(2).any(|w| w == ["--output_format", "txt"]));
        assert!(args.windows(2).any(|w| w == ["--language", "en"]));
    }

    #[test]
    fn test_build_args_without_language() {
        let transcriber = WhisperCliTranscriber::new("whisper", "small");
        let args = transcriber.build_args(Path::new("a.wav"), Path::new("."));
        assert!(!args.contains(&"--language".to_string()));
    }

    #[test]
    fn test_transcript_path_uses_stem() {
        let path = WhisperCliTranscriber::transcript_path(Path::new("/s/audio_3.wav"), Path::new("/s"));
        assert_eq!(path, PathBuf::from("/s/audio_3.txt"));
    }

    #[test]
    fn test_normalize_transcript() {
        assert_eq!(
            normalize_transcript(" Hello there.\n  General   Kenobi.\n"),
            "Hello there. General Kenobi."
        );
        assert_eq!(normalize_transcript("\n\n"), "");
    }

    #[tokio::test]
    async fn test_missing_audio_is_rejected() {
        let transcriber = WhisperCliTranscriber::new("whisper", "base");
        let result = transcriber.transcribe(Path::new("/nope/audio_0.wav")).await;
        assert!(matches!(result, Err(DomainError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_missing_program_is_transcription_failure() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("audio_0.wav");
        std::fs::write(&audio, b"RIFF").unwrap();

        let transcriber = WhisperCliTranscriber::new("/nonexistent/whisper-for-tests", "base");
        let result = transcriber.transcribe(&audio).await;
        assert!(matches!(result, Err(DomainError::TranscriptionFailed(_))));
    }
}
