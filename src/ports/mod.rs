// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for media file probing
#[async_trait]
pub trait MediaProbePort: Send + Sync {
    /// Probe a media file for duration, frame size and audio presence
    async fn probe(&self, path: &Path) -> Result<MediaInfo, DomainError>;
}

/// Port for decode/composite/encode work
#[async_trait]
pub trait MediaEnginePort: Send + Sync {
    /// Write the source audio of one segment to `dest` (speech-ready WAV)
    async fn extract_audio(
        &self,
        source: &Path,
        segment: &Segment,
        dest: &Path,
    ) -> Result<(), DomainError>;

    /// Encode a fully described composition to `dest`
    async fn render(
        &self,
        composition: &Composition,
        dest: &Path,
    ) -> Result<ClipArtifact, DomainError>;
}

/// Port for speech-to-text
#[async_trait]
pub trait TranscriberPort: Send + Sync {
    /// Plain text for the whole audio file; may be empty
    async fn transcribe(&self, audio: &Path) -> Result<String, DomainError>;
}

/// Port for bundling artifacts into one package
#[async_trait]
pub trait ArchiverPort: Send + Sync {
    async fn package(
        &self,
        artifacts: &[ClipArtifact],
        dest: &Path,
    ) -> Result<OutputPackage, DomainError>;
}

/// Scratch directories for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub root: PathBuf,
    pub clips_dir: PathBuf,
}

/// Port for the per-run scratch workspace
#[async_trait]
pub trait WorkspacePort: Send + Sync {
    /// Create a fresh workspace with an empty clips directory
    async fn create(&self) -> Result<Workspace, DomainError>;

    /// Remove the workspace and everything in it
    async fn discard(&self, workspace: &Workspace) -> Result<(), DomainError>;
}

/// Access gate capability
pub trait AuthorizationPort: Send + Sync {
    fn is_authorized(&self, identity: &str) -> bool;
}
