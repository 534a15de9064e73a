//! Lock outcome and configuration types.

use std::path::PathBuf;

/// Default marker file name.
pub const DEFAULT_LOCK_NAME: &str = "lockfile.lock";

/// Outcome of a non-blocking acquisition attempt.
///
/// Contention is an expected, common result and is therefore modeled as a
/// value rather than an error. Only genuine filesystem failures surface as
/// [`LockError::LockFailed`](crate::error::LockError::LockFailed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquire {
    /// The marker file was created; this handle now holds the lock.
    Acquired,
    /// The marker file already exists; someone else holds the lock.
    Contended,
}

impl Acquire {
    /// True when the attempt won the lock.
    pub fn is_acquired(self) -> bool {
        matches!(self, Acquire::Acquired)
    }
}

/// Configuration for a [`LockFile`](crate::lock::LockFile).
#[derive(Debug, Clone)]
pub struct LockOptions {
    /// Marker file name (default `lockfile.lock`).
    pub name: String,

    /// Directory containing the marker (default `.`).
    pub path: PathBuf,

    /// Whether to include the current thread id in the handle's identity
    /// (default true). The marker file format is unaffected.
    pub threaded: bool,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_LOCK_NAME.to_string(),
            path: PathBuf::from("."),
            threaded: true,
        }
    }
}

impl LockOptions {
    /// Create options with the default name, path, and threading flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the marker file name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the directory containing the marker.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Set whether the handle identity includes a thread id.
    pub fn threaded(mut self, threaded: bool) -> Self {
        self.threaded = threaded;
        self
    }

    /// The full marker path these options resolve to.
    pub fn marker_path(&self) -> PathBuf {
        self.path.join(&self.name)
    }
}

/// Identity parsed back out of a marker file, for stale-lock triage.
///
/// Purely diagnostic: the locking protocol never consults this. An operator
/// deciding whether to [`break_lock`](crate::lock::LockFile::break_lock) can
/// compare the recorded host and check whether the process is still alive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolderInfo {
    /// Hostname recorded at acquisition time.
    pub hostname: String,

    /// Process id recorded at acquisition time.
    pub pid: u32,
}

impl HolderInfo {
    /// Parse the two-line marker payload (`hostname\npid\n`).
    ///
    /// Returns `None` for truncated or malformed content, which can happen
    /// when the holder crashed between creating the marker and writing the
    /// payload. The lock itself is still valid in that case.
    pub(super) fn parse(content: &str) -> Option<Self> {
        let mut lines = content.lines();
        let hostname = lines.next()?.trim();
        let pid = lines.next()?.trim().parse().ok()?;
        // The payload is exactly two lines; anything more is corruption.
        if hostname.is_empty() || lines.any(|line| !line.trim().is_empty()) {
            return None;
        }
        Some(Self {
            hostname: hostname.to_string(),
            pid,
        })
    }
}

impl std::fmt::Display for HolderInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (pid {})", self.hostname, self.pid)
    }
}
