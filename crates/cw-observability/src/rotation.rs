//! Size-based rotation of the append-only audit file.
//!
//! Archives are numbered `<path>.1` (newest) to `<path>.<backup_count>`
//! (oldest). Rotating shifts every archive up by one and discards whatever
//! would land beyond the retention bound.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::info;

/// An append-only file that rotates once it would exceed `max_bytes`.
///
/// Callers must serialize access; the type itself holds no lock.
#[derive(Debug, Clone)]
pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
}

impl RotatingFile {
    /// `max_bytes == 0` disables rotation. `backup_count == 0` truncates the
    /// active file instead of archiving it.
    pub fn new(path: impl Into<PathBuf>, max_bytes: u64, backup_count: usize) -> Self {
        Self {
            path: path.into(),
            max_bytes,
            backup_count,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of archive number `index` (1 is the most recent).
    pub fn archive_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    /// Archives currently on disk, newest first.
    pub async fn archives(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for index in 1..=self.backup_count {
            let candidate = self.archive_path(index);
            if fs::metadata(&candidate).await.is_ok() {
                found.push(candidate);
            }
        }
        found
    }

    /// Appends `line` plus a newline as a single write, rotating first if
    /// the record would push the active file past the threshold.
    pub async fn append_line(&self, line: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let record = format!("{}\n", line);
        let current = match fs::metadata(&self.path).await {
            Ok(meta) => Some(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };

        if let Some(size) = current {
            if self.max_bytes > 0 && size > 0 && size + record.len() as u64 > self.max_bytes {
                self.rotate().await?;
            }
        }

        let mut file = append_options().open(&self.path).await?;
        file.write_all(record.as_bytes()).await?;
        file.flush().await
    }

    async fn rotate(&self) -> io::Result<()> {
        if self.backup_count == 0 {
            info!(path = %self.path.display(), "Truncating audit log (no archives retained)");
            fs::File::create(&self.path).await?;
            return Ok(());
        }

        remove_if_exists(&self.archive_path(self.backup_count)).await?;
        for index in (1..self.backup_count).rev() {
            let from = self.archive_path(index);
            if fs::metadata(&from).await.is_ok() {
                fs::rename(&from, self.archive_path(index + 1)).await?;
            }
        }
        fs::rename(&self.path, self.archive_path(1)).await?;

        info!(path = %self.path.display(), "Rotated audit log");
        Ok(())
    }
}

async fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// New files are created owner-only on unix; elsewhere the platform
/// defaults apply.
fn append_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    options.mode(0o600);
    options
}
