//! Error types for simplelock.
//!
//! Uses thiserror for derive macros. Lock contention is deliberately NOT an
//! error here: a failed-but-expected acquisition is reported through the
//! [`Acquire`](crate::lock::Acquire) outcome instead, so these variants only
//! cover conditions the caller cannot treat as normal control flow.

use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for simplelock operations.
#[derive(Error, Debug)]
pub enum LockError {
    /// The configured root path does not resolve to an existing directory.
    #[error("invalid root path '{path}': {reason}")]
    InvalidPath {
        /// The path as supplied by the caller, before expansion.
        path: String,
        /// Why resolution failed (not found, not a directory, ...).
        reason: String,
    },

    /// An operation needed the process-wide root path before one was set.
    #[error("no root path configured; call root::set_root first")]
    NotConfigured,

    /// Marker creation failed for a reason other than pre-existence
    /// (permissions, I/O error, disk full).
    #[error("failed to create lock file '{}'", path.display())]
    LockFailed {
        /// Path of the marker file that could not be created.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// Release was attempted but the marker file does not exist.
    #[error("'{}' is not locked", .0.display())]
    NotLocked(PathBuf),

    /// Release was attempted on a marker this handle did not create.
    #[error("'{}' is locked, but not by this handle", .0.display())]
    NotMyLock(PathBuf),

    /// A retry-with-deadline acquisition exhausted its deadline.
    #[error("timed out after {timeout:?} waiting to acquire '{}'", path.display())]
    LockTimeout {
        /// Path of the contended marker file.
        path: PathBuf,
        /// The caller-supplied deadline that elapsed.
        timeout: Duration,
    },

    /// A filesystem operation other than marker creation failed
    /// (currently only marker removal).
    #[error("lock file operation on '{}' failed", path.display())]
    Io {
        /// Path of the marker file involved.
        path: PathBuf,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },
}

/// Result type alias for simplelock operations.
pub type Result<T> = std::result::Result<T, LockError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_path_message_names_the_path() {
        let err = LockError::InvalidPath {
            path: "/no/such/dir".to_string(),
            reason: "does not exist".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid root path '/no/such/dir': does not exist"
        );
    }

    #[test]
    fn not_configured_message_points_at_set_root() {
        let err = LockError::NotConfigured;
        assert!(err.to_string().contains("set_root"));
    }

    #[test]
    fn lock_failed_keeps_the_source_error() {
        let err = LockError::LockFailed {
            path: PathBuf::from("/tmp/x.lock"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let source = std::error::Error::source(&err).expect("source attached");
        assert!(source.to_string().contains("denied"));
    }

    #[test]
    fn unlock_errors_are_distinct() {
        let not_locked = LockError::NotLocked(PathBuf::from("a.lock"));
        let not_mine = LockError::NotMyLock(PathBuf::from("a.lock"));
        assert!(not_locked.to_string().contains("is not locked"));
        assert!(not_mine.to_string().contains("not by this handle"));
    }

    #[test]
    fn timeout_message_includes_duration() {
        let err = LockError::LockTimeout {
            path: PathBuf::from("a.lock"),
            timeout: Duration::from_millis(250),
        };
        assert!(err.to_string().contains("250ms"));
    }
}
