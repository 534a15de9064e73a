//! The lock handle: atomic marker creation, release, and observation.

use crate::error::{LockError, Result};
use crate::lock::guard::LockGuard;
use crate::lock::types::{Acquire, HolderInfo, LockOptions};
use crate::root;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// A handle to one named lock backed by a marker file.
///
/// The marker file's existence is the lock state: creating it exclusively
/// acquires the lock, removing it releases. The handle tracks whether *it*
/// performed the acquisition in an in-memory flag, which is what makes
/// [`release`](LockFile::release) able to distinguish "not locked" from
/// "locked by someone else" without parsing marker content.
///
/// Construction performs no filesystem I/O. A marker left behind by a
/// crashed process looks identical to a held lock; see
/// [`holder`](LockFile::holder) and [`break_lock`](LockFile::break_lock)
/// for operator recovery.
#[derive(Debug)]
pub struct LockFile {
    /// Full path of the marker file.
    marker: PathBuf,

    /// Hostname captured at construction, written into the marker payload.
    hostname: String,

    /// Process id captured at construction, written into the marker payload.
    pid: u32,

    /// Thread identity captured when `threaded` is set. Diagnostic only;
    /// never written to the marker (its format is fixed at two lines).
    thread: Option<String>,

    /// Set by a successful `acquire`, cleared by `release`.
    holding: bool,
}

impl LockFile {
    /// Create a handle from options. Cheap; touches no files.
    pub fn new(options: LockOptions) -> Self {
        let hostname = hostname::get()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        let thread = options
            .threaded
            .then(|| format!("{:?}", std::thread::current().id()));

        Self {
            marker: options.marker_path(),
            hostname,
            pid: std::process::id(),
            thread,
            holding: false,
        }
    }

    /// Create a handle for `name` under the process-wide configured root.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::NotConfigured`] when no root has been set via
    /// [`root::set_root`].
    pub fn at_configured_root(name: impl Into<String>) -> Result<Self> {
        let root_dir = root::get_root()?;
        Ok(Self::new(LockOptions::new().name(name).path(root_dir)))
    }

    /// Path of the marker file this handle locks.
    pub fn path(&self) -> &Path {
        &self.marker
    }

    /// Thread identity recorded for this handle, when constructed with
    /// `threaded` set.
    pub fn thread_id(&self) -> Option<&str> {
        self.thread.as_deref()
    }

    /// Attempt to acquire the lock without blocking.
    ///
    /// Creates the marker file with exclusive-create semantics: one atomic
    /// filesystem call decides the outcome, never an existence check
    /// followed by a write. Returns [`Acquire::Contended`] when the marker
    /// already exists.
    ///
    /// On success the identity payload (hostname and pid, one per line) is
    /// written best-effort. A payload write failure does NOT roll back the
    /// acquisition; the lock stays held and the failure is logged at warn
    /// level, since lock state is existence-based and the payload is purely
    /// informational.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::LockFailed`] when creation fails for any reason
    /// other than pre-existence (permissions, I/O error, disk full).
    pub fn acquire(&mut self) -> Result<Acquire> {
        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.marker)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(Acquire::Contended),
            Err(e) => {
                return Err(LockError::LockFailed {
                    path: self.marker.clone(),
                    source: e,
                });
            }
        };

        // The lock is held from this point regardless of payload outcome.
        self.holding = true;

        let payload = format!("{}\n{}\n", self.hostname, self.pid);
        if let Err(e) = file
            .write_all(payload.as_bytes())
            .and_then(|()| file.sync_all())
        {
            tracing::warn!(
                marker = %self.marker.display(),
                error = %e,
                "lock acquired but identity payload could not be written"
            );
        }

        Ok(Acquire::Acquired)
    }

    /// Acquire with a retry loop and deadline.
    ///
    /// Polls [`acquire`](LockFile::acquire) every `poll_interval` until it
    /// succeeds or `timeout` elapses. No fairness among waiters: any
    /// concurrent attempt may win once the marker is absent.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::LockTimeout`] when the deadline elapses while
    /// the lock is still contended, and [`LockError::LockFailed`] for
    /// genuine filesystem failures.
    pub fn acquire_timeout(&mut self, timeout: Duration, poll_interval: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.acquire()?.is_acquired() {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(LockError::LockTimeout {
                    path: self.marker.clone(),
                    timeout,
                });
            }
            std::thread::sleep(poll_interval.min(deadline - now));
        }
    }

    /// Release the lock by removing the marker file.
    ///
    /// # Errors
    ///
    /// - [`LockError::NotLocked`] when the marker does not exist (including
    ///   after someone force-removed it with [`break_lock`](LockFile::break_lock)).
    /// - [`LockError::NotMyLock`] when the marker exists but this handle's
    ///   acquisition flag is not set.
    /// - [`LockError::Io`] when removal itself fails; the handle still
    ///   holds the lock and the release can be retried.
    pub fn release(&mut self) -> Result<()> {
        if !self.holding {
            if self.marker.exists() {
                return Err(LockError::NotMyLock(self.marker.clone()));
            }
            return Err(LockError::NotLocked(self.marker.clone()));
        }

        match fs::remove_file(&self.marker) {
            Ok(()) => {
                self.holding = false;
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // Held by us in memory, but the marker is gone: a forced
                // break from another party. Surfaced, not hidden.
                self.holding = false;
                Err(LockError::NotLocked(self.marker.clone()))
            }
            // Removal failed but the marker is still ours; keep the
            // holding flag so the release can be retried.
            Err(e) => Err(LockError::Io {
                path: self.marker.clone(),
                source: e,
            }),
        }
    }

    /// Whether the marker file currently exists.
    ///
    /// Pure observation with no synchronization: the result may be stale
    /// the instant after it is read.
    pub fn is_locked(&self) -> bool {
        self.marker.exists()
    }

    /// Whether this handle holds the lock: a successful `acquire` not yet
    /// matched by a `release`, and the marker still present.
    pub fn i_am_locking(&self) -> bool {
        self.holding && self.marker.exists()
    }

    /// Force-remove the marker regardless of who created it.
    ///
    /// Operator recovery for markers left behind by crashed holders. A
    /// no-op when the marker is already absent. This cannot clear a live
    /// holder's in-memory state, so breaking a lock someone still holds
    /// makes their later `release` fail with
    /// [`LockError::NotLocked`] - an accepted risk of forced breakage.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::Io`] when removal fails for a reason other
    /// than absence.
    pub fn break_lock(&self) -> Result<()> {
        match fs::remove_file(&self.marker) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LockError::Io {
                path: self.marker.clone(),
                source: e,
            }),
        }
    }

    /// Read the holder identity recorded in the marker, if any.
    ///
    /// Best-effort diagnostics for deciding whether a lock is stale:
    /// returns `None` when the marker is absent, unreadable, or its payload
    /// was never fully written. The locking protocol itself never consults
    /// this.
    pub fn holder(&self) -> Option<HolderInfo> {
        let content = fs::read_to_string(&self.marker).ok()?;
        HolderInfo::parse(&content)
    }

    /// Acquire and wrap the result in a scoped guard.
    ///
    /// Returns `Ok(None)` on contention so callers can branch into a
    /// fallback path instead of entering the critical section. On
    /// `Ok(Some(guard))` the lock is released when the guard drops, on
    /// every exit path including unwinding.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::LockFailed`] for filesystem failures, as
    /// [`acquire`](LockFile::acquire) does.
    pub fn try_guard(&mut self) -> Result<Option<LockGuard<'_>>> {
        match self.acquire()? {
            Acquire::Acquired => Ok(Some(LockGuard::new(self))),
            Acquire::Contended => Ok(None),
        }
    }
}

impl std::fmt::Display for LockFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LockFile({}, {} (pid {}))",
            self.marker.display(),
            self.hostname,
            self.pid
        )
    }
}
