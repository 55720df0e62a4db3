use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::models::PendingFile;

/// Directory holding per-job copies of uploaded files.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
    clock: fn() -> i64,
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            clock: now_millis,
        }
    }

    /// Replaces the epoch-millisecond source used to prefix staged names.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Writes `file` to `{epoch_millis}-{name}` and returns a guard that owns
    /// the path from then on.
    ///
    /// The path is created with create-new semantics: a same-millisecond
    /// collision fails this call rather than clobbering another job's copy.
    pub async fn stage(&self, file: &PendingFile) -> io::Result<StagedFile> {
        let path = self
            .root
            .join(format!("{}-{}", (self.clock)(), file.safe_name()));

        let mut handle = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        // Armed before writing so a short write is cleaned up too.
        let staged = StagedFile { path, armed: true };
        handle.write_all(file.bytes()).await?;
        handle.flush().await?;

        debug!(staged_path = %staged.path.display(), bytes = file.size, "File staged");
        Ok(staged)
    }
}

/// A staged artifact, deleted when the guard is released or dropped.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    armed: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Deletes the artifact. Failures are logged, never returned.
    pub async fn release(mut self) {
        self.armed = false;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(staged_path = %self.path.display(), "Staged file removed"),
            Err(e) => warn!(
                staged_path = %self.path.display(),
                error = %e,
                "Failed to remove staged file"
            ),
        }
    }
}

impl Drop for StagedFile {
    // Reached only when the owning job unwinds or is cancelled before
    // `release` runs.
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(staged_path = %self.path.display(), "Staged file removed on drop"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                staged_path = %self.path.display(),
                error = %e,
                "Failed to remove staged file on drop"
            ),
        }
    }
}
