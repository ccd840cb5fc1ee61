//! Per-run scratch directory
//!
//! Holds the original upload (`og`) and the transcoder outputs for one pipeline run.
//! The directory is removed when the workspace is dropped, so every exit path of the
//! run cleans up, including early returns through `?`.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

const ORIGINAL_FILE_NAME: &str = "og";

#[derive(Debug)]
pub struct ScratchWorkspace {
    id: Uuid,
    dir: TempDir,
}

impl ScratchWorkspace {
    /// Create `{root}/{uuid}`. The root is created if missing.
    pub async fn create(root: &Path) -> io::Result<Self> {
        tokio::fs::create_dir_all(root).await?;

        let id = Uuid::new_v4();
        let dir = tempfile::Builder::new()
            .prefix(&id.to_string())
            .rand_bytes(0)
            .tempdir_in(root)?;

        tracing::debug!(workspace_id = %id, path = %dir.path().display(), "Scratch workspace created");

        Ok(Self { id, dir })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn original_path(&self) -> PathBuf {
        self.dir.path().join(ORIGINAL_FILE_NAME)
    }

    /// Write the whole original upload in one go.
    pub async fn write_original(&self, data: &[u8]) -> io::Result<PathBuf> {
        let path = self.original_path();
        let mut file = tokio::fs::File::create(&path).await?;
        file.write_all(data).await?;
        file.flush().await?;
        Ok(path)
    }

    /// Open the original file for streamed writes.
    pub async fn original_writer(&self) -> io::Result<tokio::fs::File> {
        tokio::fs::File::create(self.original_path()).await
    }

    /// Remove the directory now and report failures, instead of silently on drop.
    pub fn close(self) -> io::Result<()> {
        let id = self.id;
        self.dir.close()?;
        tracing::debug!(workspace_id = %id, "Scratch workspace removed");
        Ok(())
    }
}
