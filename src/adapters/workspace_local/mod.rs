// Local workspace adapter - per-run scratch directories on disk

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// Name of the directory holding rendered clips inside a workspace
pub const CLIPS_DIR_NAME: &str = "clips";

/// Scratch workspaces under the system temp dir or a configured root
pub struct LocalWorkspaceAdapter {
    root: Option<PathBuf>,
}

impl LocalWorkspaceAdapter {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }
}

impl Default for LocalWorkspaceAdapter {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl WorkspacePort for LocalWorkspaceAdapter {
    async fn create(&self) -> Result<Workspace, DomainError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("clipper-");

        let dir = match &self.root {
            Some(root) => {
                tokio::fs::create_dir_all(root).await.map_err(|e| {
                    DomainError::FsFail(format!(
                        "Failed to create workspace root {}: {}",
                        root.display(),
                        e
                    ))
                })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(|e| DomainError::FsFail(format!("Failed to create workspace: {}", e)))?;

        // Lifetime is managed by discard()
        let root = dir.into_path();
        let clips_dir = root.join(CLIPS_DIR_NAME);
        tokio::fs::create_dir_all(&clips_dir).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create {}: {}",
                clips_dir.display(),
                e
            ))
        })?;

        debug!(workspace = %root.display(), "Created workspace");
        Ok(Workspace { root, clips_dir })
    }

    async fn discard(&self, workspace: &Workspace) -> Result<(), DomainError> {
        match tokio::fs::remove_dir_all(&workspace.root).await {
            Ok(()) => {
                debug!(workspace = %workspace.root.display(), "Discarded workspace");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to remove {}: {}",
                workspace.root.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_discard() {
        let parent = tempfile::tempdir().unwrap();
        let adapter = LocalWorkspaceAdapter::new(Some(parent.path().join("scratch")));

        let workspace = adapter.create().await.unwrap();
        assert!(workspace.root.starts_with(parent.path()));
        assert!(workspace.clips_dir.is_dir());
        assert_eq!(workspace.clips_dir, workspace.root.join(CLIPS_DIR_NAME));

        std::fs::write(workspace.clips_dir.join("MyClip_Part_1.mp4"), b"x").unwrap();
        adapter.discard(&workspace).await.unwrap();
        assert!(!workspace.root.exists());
    }

    #[tokio::test]
    async fn test_workspaces_are_distinct() {
        let parent = tempfile::tempdir().unwrap();
        let adapter = LocalWorkspaceAdapter::new(Some(parent.path().to_path_buf()));

        let first = adapter.create().await.unwrap();
        let second = adapter.create().await.unwrap();
        assert_ne!(first.root, second.root);
    }

    #[tokio::test]
    async fn test_discard_twice_is_ok() {
        let parent = tempfile::tempdir().unwrap();
        let adapter = LocalWorkspaceAdapter::new(Some(parent.path().to_path_buf()));

        let workspace = adapter.create().await.unwrap();
        adapter.discard(&workspace).await.unwrap();
        assert!(adapter.discard(&workspace).await.is_ok());
    }
}
