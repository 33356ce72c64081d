//! Ephemeral frame workspace management.
//!
//! One workspace holds the extracted frames of a single scan. It is created
//! under the system scratch location (or a configured base directory) and
//! recursively removed when the scan ends, on every exit path. The tempfile
//! crate's Drop implementation removes the directory even if the owning
//! scan panics; [`Workspace::release`] is the normal, explicit teardown.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tempfile::{Builder as TempFileBuilder, TempDir};

const WORKSPACE_PREFIX: &str = "stegsweep_frames_";

/// Exclusively owned directory holding one scan's extracted frames.
#[derive(Debug)]
pub struct Workspace {
    dir: Option<TempDir>,
    root: PathBuf,
    created_at: DateTime<Local>,
}

impl Workspace {
    /// Creates a uniquely named, empty workspace directory.
    ///
    /// When `base` is given it is created first and the workspace is placed
    /// inside it; otherwise the system temp dir is used. An unwritable
    /// location yields `CoreError::Resource`.
    pub fn acquire(base: Option<&Path>) -> CoreResult<Self> {
        let dir = match base {
            Some(base) => {
                std::fs::create_dir_all(base).map_err(|e| {
                    CoreError::Resource(format!(
                        "cannot create workspace base '{}': {e}",
                        base.display()
                    ))
                })?;
                TempFileBuilder::new()
                    .prefix(WORKSPACE_PREFIX)
                    .tempdir_in(base)
            }
            None => TempFileBuilder::new().prefix(WORKSPACE_PREFIX).tempdir(),
        }
        .map_err(|e| CoreError::Resource(format!("failed to create frame workspace: {e}")))?;

        let root = dir.path().to_path_buf();
        log::debug!("Acquired frame workspace: {}", root.display());

        Ok(Self {
            dir: Some(dir),
            root,
            created_at: Local::now(),
        })
    }

    /// Unique identifier of this workspace (its directory name).
    pub fn id(&self) -> &str {
        self.root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(WORKSPACE_PREFIX)
    }

    /// Path frames are extracted into. Valid only until release.
    pub fn root_path(&self) -> &Path {
        &self.root
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    pub fn is_released(&self) -> bool {
        self.dir.is_none()
    }

    /// Recursively removes the workspace directory.
    ///
    /// Idempotent: releasing twice, or releasing a workspace whose directory
    /// was already removed externally, succeeds without error.
    pub fn release(&mut self) -> CoreResult<()> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };

        if !self.root.exists() {
            // Directory is already gone; don't let TempDir fail trying
            // to remove it again on drop.
            let _ = dir.keep();
            return Ok(());
        }

        log::debug!("Releasing frame workspace: {}", self.root.display());
        dir.close().map_err(|e| {
            CoreError::Resource(format!(
                "failed to remove frame workspace '{}': {e}",
                self.root.display()
            ))
        })
    }
}
