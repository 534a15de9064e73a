//! Guarded call: bracket a callable with lock acquisition and release.
//!
//! This is the higher-order equivalent of wrapping a function in a lock
//! decorator: the lock is acquired before the callable runs and released
//! after it finishes, on every exit path. When the lock is contended the
//! callable is never invoked and a caller-supplied fallback value is
//! returned instead.

use crate::error::Result;
use crate::lock::{LockFile, LockOptions};

/// Run `body` under the lock described by `options`, or return `fallback`
/// when the lock is contended.
///
/// Behavior:
/// 1. A [`LockFile`] is constructed for the options and acquired.
/// 2. On contention, `Ok(fallback)` is returned immediately; `body` is never
///    invoked and nothing is released.
/// 3. On acquisition, `body` runs inside a scoped guard, so the lock is
///    released before control leaves this function whether `body` returns
///    normally or unwinds. The return value passes through unchanged.
///
/// Failures from `body` itself are never converted: a `body` returning
/// `Result` has its value passed through inside `Ok`, and a panicking
/// `body` unwinds through the guard (which still releases) to the caller.
/// The fallback is an opaque caller value; anything with the callable's
/// return type works, including a canned "resource busy" response object.
///
/// # Errors
///
/// Returns [`LockError::LockFailed`](crate::error::LockError::LockFailed)
/// when marker creation fails for a reason other than contention.
pub fn guarded_call<T>(options: LockOptions, fallback: T, body: impl FnOnce() -> T) -> Result<T> {
    let mut lock = LockFile::new(options);
    match lock.try_guard()? {
        Some(_guard) => Ok(body()),
        None => Ok(fallback),
    }
}
