//! ZIP archiver adapter

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Bundles clip artifacts into a single ZIP file.
///
/// Entries are stored uncompressed; the clips are already compressed video.
pub struct ZipArchiver;

impl ZipArchiver {
    pub fn new() -> Self {
        Self
    }

    fn write_archive(artifacts: &[ClipArtifact], dest: &Path) -> Result<OutputPackage, DomainError> {
        if artifacts.is_empty() {
            return Err(DomainError::ArchiveFailed(
                "No clips to package".to_string(),
            ));
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::ArchiveFailed(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let file = File::create(dest).map_err(|e| {
            DomainError::ArchiveFailed(format!("Failed to create {}: {}", dest.display(), e))
        })?;
        let mut writer = ZipWriter::new(BufWriter::new(file));
        let mut entries = Vec::with_capacity(artifacts.len());

        for artifact in artifacts {
            let mut input = File::open(&artifact.path).map_err(|e| {
                DomainError::ArchiveFailed(format!(
                    "Failed to open clip {}: {}",
                    artifact.path.display(),
                    e
                ))
            })?;
            let size = input.metadata().map(|m| m.len()).unwrap_or(0);
            let options = SimpleFileOptions::default()
                .compression_method(CompressionMethod::Stored)
                .large_file(size >= u32::MAX as u64);

            writer
                .start_file(artifact.file_name.as_str(), options)
                .map_err(|e| {
                    DomainError::ArchiveFailed(format!(
                        "Failed to add {}: {}",
                        artifact.file_name, e
                    ))
                })?;
            std::io::copy(&mut input, &mut writer).map_err(|e| {
                DomainError::ArchiveFailed(format!(
                    "Failed to write {}: {}",
                    artifact.file_name, e
                ))
            })?;
            entries.push(artifact.file_name.clone());
        }

        writer
            .finish()
            .map_err(|e| DomainError::ArchiveFailed(format!("Failed to finish archive: {}", e)))?;

        Ok(OutputPackage {
            path: dest.to_path_buf(),
            entries,
        })
    }
}

impl Default for ZipArchiver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArchiverPort for ZipArchiver {
    async fn package(
        &self,
        artifacts: &[ClipArtifact],
        dest: &Path,
    ) -> Result<OutputPackage, DomainError> {
        let owned_artifacts = artifacts.to_vec();
        let owned_dest: PathBuf = dest.to_path_buf();

        let package = tokio::task::spawn_blocking(move || {
            Self::write_archive(&owned_artifacts, &owned_dest)
        })
        .await
        .map_err(|e| DomainError::ArchiveFailed(format!("Archive task failed: {}", e)))??;

        info!(
            archive = %package.path.display(),
            entries = package.entries.len(),
            "Packaged clips"
        );
        Ok(package)
    }
}
