//! # File I/O Module
//!
//! Everything that touches the filesystem:
//! - **Design files**: `.forge` JSON files holding a [`ForgeProject`], saved
//!   atomically and version-checked on load
//! - **Configuration**: partial JSON overrides of [`ForgeConfig`]
//! - **Output files**: the rendered build guide, written through an
//!   [`OutputFile`] guard that commits by rename or leaves nothing behind
//!
//! ## Locking
//!
//! A target `guide.pdf` is locked by `guide.pdf.lock`, which holds JSON
//! metadata about the holder and an OS-level lock (fs2) on the same handle.
//! Stale locks (dead process on this machine, or older than 24 hours) are
//! taken over.
//!
//! ## Example
//!
//! ```rust,no_run
//! use forge_core::file_io::OutputFile;
//! use std::path::Path;
//!
//! let mut out = OutputFile::create(Path::new("forge-build-guide.pdf"), "builder")?;
//! out.write_all(b"%PDF-1.7")?;
//! let written = out.commit()?;
//! println!("wrote {}", written.display());
//! # Ok::<(), forge_core::errors::ForgeError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ForgeConfig;
use crate::errors::{ForgeError, ForgeResult};
use crate::project::{ForgeProject, SCHEMA_VERSION};

/// Lock file metadata stored in `.lock` files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

// ============================================================================
// Locks
// ============================================================================

/// Exclusive lock on a target file, released when dropped.
///
/// Holds both an OS-level lock (fs2) for process safety and a `.lock` file
/// with metadata so other users can see who holds it.
#[derive(Debug)]
pub struct FileLock {
    target_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on `path`.
    ///
    /// Fails with [`ForgeError::FileLocked`] when another live process holds
    /// the lock.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> ForgeResult<Self> {
        let lock_path = sibling_path(path, "lock");
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(ForgeError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                warn!(
                    path = %path.display(),
                    holder = %existing.user_id,
                    "taking over stale lock"
                );
            }
        }

        // Holder metadata is only replaced once the OS lock is ours
        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                ForgeError::file_error("create lock", lock_path.display().to_string(), e.to_string())
            })?;

        lock_file.try_lock_exclusive().map_err(|_| {
            ForgeError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(|e| {
            ForgeError::SerializationError {
                reason: e.to_string(),
            }
        })?;

        lock_file.set_len(0).map_err(|e| {
            ForgeError::file_error("reset lock", lock_path.display().to_string(), e.to_string())
        })?;
        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            ForgeError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;

        lock_file.sync_all().map_err(|e| {
            ForgeError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        debug!(path = %path.display(), "lock acquired");
        Ok(FileLock {
            target_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check whether a file is locked without acquiring the lock.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = sibling_path(path, "lock");
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `guide.pdf` + `lock` -> `guide.pdf.lock`
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut sibling = path.to_path_buf();
    let extension = sibling
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    sibling.set_extension(extension);
    sibling
}

fn read_lock_info(lock_path: &Path) -> ForgeResult<LockInfo> {
    let contents = read_to_string(lock_path, "read lock")?;
    serde_json::from_str(&contents).map_err(|e| ForgeError::SerializationError {
        reason: e.to_string(),
    })
}

/// A lock is stale when its process is gone (same machine) or it is over a day old.
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

// ============================================================================
// Output files
// ============================================================================

/// Scoped writer for a generated file.
///
/// Bytes go to `<target>.tmp` while `<target>.lock` is held. [`commit`]
/// syncs and renames the temporary over the target. Dropping the guard
/// without committing removes the temporary; the lock is released either
/// way, so an aborted run never leaves a partial guide behind.
///
/// [`commit`]: OutputFile::commit
pub struct OutputFile {
    target_path: PathBuf,
    tmp_path: PathBuf,
    file: Option<File>,
    committed: bool,
    _lock: FileLock,
}

impl OutputFile {
    /// Lock `path` and open its temporary for writing.
    pub fn create(path: &Path, user_id: impl Into<String>) -> ForgeResult<Self> {
        let lock = FileLock::acquire(path, user_id)?;
        let tmp_path = sibling_path(path, "tmp");
        let file = File::create(&tmp_path).map_err(|e| {
            ForgeError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
        })?;

        Ok(OutputFile {
            target_path: path.to_path_buf(),
            tmp_path,
            file: Some(file),
            committed: false,
            _lock: lock,
        })
    }

    pub fn write_all(&mut self, bytes: &[u8]) -> ForgeResult<()> {
        let tmp_path = &self.tmp_path;
        let file = self.file.as_mut().ok_or_else(|| {
            ForgeError::file_error("write temp file", tmp_path.display().to_string(), "file already closed")
        })?;
        file.write_all(bytes).map_err(|e| {
            ForgeError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
        })
    }

    /// Sync the temporary and rename it over the target.
    pub fn commit(mut self) -> ForgeResult<PathBuf> {
        let file = self.file.take().ok_or_else(|| {
            ForgeError::file_error(
                "sync temp file",
                self.tmp_path.display().to_string(),
                "file already closed",
            )
        })?;
        file.sync_all().map_err(|e| {
            ForgeError::file_error("sync temp file", self.tmp_path.display().to_string(), e.to_string())
        })?;
        drop(file);

        fs::rename(&self.tmp_path, &self.target_path).map_err(|e| {
            ForgeError::file_error("rename to final", self.target_path.display().to_string(), e.to_string())
        })?;
        self.committed = true;

        debug!(path = %self.target_path.display(), "output committed");
        Ok(self.target_path.clone())
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }
}

impl Drop for OutputFile {
    fn drop(&mut self) {
        if !self.committed {
            self.file.take();
            let _ = fs::remove_file(&self.tmp_path);
            debug!(path = %self.target_path.display(), "output discarded");
        }
    }
}

// ============================================================================
// Design files and configuration
// ============================================================================

/// Save a design with atomic write semantics.
///
/// The JSON is written to `<path>.tmp`, synced, then renamed over `path`,
/// so an interrupted save never corrupts an existing design.
pub fn save_design(project: &ForgeProject, path: &Path) -> ForgeResult<()> {
    let json = serde_json::to_string_pretty(project).map_err(|e| ForgeError::SerializationError {
        reason: e.to_string(),
    })?;

    let tmp_path = sibling_path(path, "tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        ForgeError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        ForgeError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        ForgeError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        ForgeError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    debug!(path = %path.display(), "design saved");
    Ok(())
}

/// Load a design file and check its schema version.
///
/// # Errors
///
/// * `FileError` - the file could not be read
/// * `SerializationError` - invalid JSON
/// * `VersionMismatch` - written by an incompatible schema
pub fn load_design(path: &Path) -> ForgeResult<ForgeProject> {
    let contents = read_to_string(path, "read")?;

    let project: ForgeProject =
        serde_json::from_str(&contents).map_err(|e| ForgeError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&project.meta.schema_version)?;
    project.config.validate()?;

    debug!(path = %path.display(), builder = %project.meta.builder, "design loaded");
    Ok(project)
}

/// Load a design, also reporting whether someone else holds its lock.
pub fn load_design_with_lock_check(path: &Path) -> ForgeResult<(ForgeProject, Option<LockInfo>)> {
    let project = load_design(path)?;
    let lock_info = FileLock::check(path);
    Ok((project, lock_info))
}

/// Load a configuration file. Omitted fields keep their defaults.
pub fn load_config(path: &Path) -> ForgeResult<ForgeConfig> {
    let contents = read_to_string(path, "read config")?;
    let config: ForgeConfig =
        serde_json::from_str(&contents).map_err(|e| ForgeError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;
    config.validate()?;
    Ok(config)
}

fn read_to_string(path: &Path, operation: &str) -> ForgeResult<String> {
    let mut file = File::open(path)
        .map_err(|e| ForgeError::file_error(operation, path.display().to_string(), e.to_string()))?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| ForgeError::file_error(operation, path.display().to_string(), e.to_string()))?;
    Ok(contents)
}

/// Major versions must match; on 0.x a newer minor is rejected too.
fn validate_version(file_version: &str) -> ForgeResult<()> {
    let mismatch = || ForgeError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    let (Some(file_major), Some(current_major)) = (file_parts.first(), current_parts.first()) else {
        return Err(mismatch());
    };
    if file_major != current_major {
        return Err(mismatch());
    }

    if *current_major == 0 {
        if let (Some(file_minor), Some(current_minor)) = (file_parts.get(1), current_parts.get(1)) {
            if file_minor > current_minor {
                return Err(mismatch());
            }
        }
    }

    Ok(())
}
