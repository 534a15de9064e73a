//! RAII scoped acquisition.

use crate::error::Result;
use crate::lock::handle::LockFile;
use std::path::Path;

/// RAII guard binding a held lock to a lexical scope.
///
/// Obtained from [`LockFile::try_guard`]. When dropped, the lock is released
/// exactly once, on every exit path out of the scope: normal return, `?`
/// propagation, and unwinding all run the destructor. If release fails
/// during drop, a warning is logged but no panic occurs; use
/// [`release`](LockGuard::release) to handle that error explicitly.
#[derive(Debug)]
pub struct LockGuard<'a> {
    /// The handle whose acquisition this guard scopes.
    lock: &'a mut LockFile,

    /// Whether the lock has been released manually.
    released: bool,
}

impl<'a> LockGuard<'a> {
    /// Create a guard over a handle that just acquired its lock.
    pub(super) fn new(lock: &'a mut LockFile) -> Self {
        Self {
            lock,
            released: false,
        }
    }

    /// Path of the marker file held by this guard.
    pub fn path(&self) -> &Path {
        self.lock.path()
    }

    /// Manually release the lock before the guard goes out of scope,
    /// handling errors explicitly instead of leaving them to `Drop`.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.lock.release()
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = self.lock.release()
        {
            tracing::warn!(
                marker = %self.lock.path().display(),
                error = %e,
                "failed to release lock during guard drop"
            );
        }
    }
}
