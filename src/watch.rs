//! Observation-only gating on lock state.
//!
//! A watched call checks whether a lock is currently held and routes to a
//! fallback if so, without ever acquiring the lock itself. Optionally it
//! polls at a fixed interval, waiting for the marker to disappear before
//! running the callable.
//!
//! # This is not mutual exclusion
//!
//! There is an unavoidable gap between the existence check and the
//! callable's execution: another party may acquire the lock in between.
//! Watching is for reacting to lock state (skip work while a producer is
//! busy, delay a report until an import finishes), never for protecting a
//! critical section. Use [`guarded_call`](crate::wrap::guarded_call) or
//! [`LockFile::try_guard`](crate::lock::LockFile::try_guard) for that.

use crate::lock::{LockFile, LockOptions};
use std::time::{Duration, Instant};

/// Default interval between existence checks while waiting.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for a watched call.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Which lock to observe.
    pub lock: LockOptions,

    /// Interval between existence checks while waiting.
    pub poll_interval: Duration,

    /// How long to wait for the lock to clear. `None` checks exactly once.
    pub wait_timeout: Option<Duration>,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            lock: LockOptions::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            wait_timeout: None,
        }
    }
}

impl WatchOptions {
    /// Create options with a single immediate check of the default lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set which lock to observe.
    pub fn lock(mut self, lock: LockOptions) -> Self {
        self.lock = lock;
        self
    }

    /// Set the interval between existence checks.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Wait up to `timeout` for the lock to clear instead of checking once.
    pub fn wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = Some(timeout);
        self
    }
}

/// Run `body` if the watched lock is (or becomes) free, else return
/// `fallback`.
///
/// With `wait_timeout` unset the lock state is checked exactly once. With a
/// timeout, the marker is polled at `poll_interval` until it disappears or
/// the deadline elapses; an elapsed deadline routes to `fallback`.
///
/// The lock is never acquired or released here, so `body` runs unprotected;
/// see the module docs for what that means.
pub fn watch_call<T>(options: WatchOptions, fallback: T, body: impl FnOnce() -> T) -> T {
    let lock = LockFile::new(options.lock);

    let free = match options.wait_timeout {
        None => !lock.is_locked(),
        Some(timeout) => wait_until_free(&lock, options.poll_interval, timeout),
    };

    if free { body() } else { fallback }
}

/// Poll until the handle's marker disappears or `timeout` elapses.
///
/// Returns true when the lock was observed free. As with
/// [`LockFile::is_locked`](crate::lock::LockFile::is_locked), the
/// observation can be stale immediately.
pub fn wait_until_free(lock: &LockFile, poll_interval: Duration, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if !lock.is_locked() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        std::thread::sleep(poll_interval.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;

    fn watch_in(dir: &TempDir) -> WatchOptions {
        WatchOptions::new().lock(LockOptions::new().path(dir.path()))
    }

    #[test]
    fn runs_body_when_unlocked() {
        let temp_dir = TempDir::new().unwrap();

        let result = watch_call(watch_in(&temp_dir), 0, || 7);

        assert_eq!(result, 7);
    }

    #[test]
    fn routes_to_fallback_while_locked() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("lockfile.lock"), "other\n1\n").unwrap();

        let ran = AtomicBool::new(false);
        let result = watch_call(watch_in(&temp_dir), "locked", || {
            ran.store(true, Ordering::SeqCst);
            "done"
        });

        assert_eq!(result, "locked");
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[test]
    fn never_touches_the_marker() {
        let temp_dir = TempDir::new().unwrap();
        let marker = temp_dir.path().join("lockfile.lock");
        fs::write(&marker, "other\n1\n").unwrap();

        watch_call(watch_in(&temp_dir), (), || ());

        // Observation only: the foreign marker survives, and no marker
        // appears in the unlocked case either.
        assert!(marker.exists());
        fs::remove_file(&marker).unwrap();
        watch_call(watch_in(&temp_dir), (), || ());
        assert!(!marker.exists());
    }

    #[test]
    fn waits_for_lock_to_clear() {
        let temp_dir = TempDir::new().unwrap();
        let marker = temp_dir.path().join("lockfile.lock");
        fs::write(&marker, "other\n1\n").unwrap();

        let remover = {
            let marker = marker.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(50));
                fs::remove_file(&marker).unwrap();
            })
        };

        let options = watch_in(&temp_dir)
            .poll_interval(Duration::from_millis(10))
            .wait_timeout(Duration::from_secs(5));
        let result = watch_call(options, "locked", || "done");

        remover.join().unwrap();
        assert_eq!(result, "done");
    }

    #[test]
    fn falls_back_when_wait_deadline_elapses() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("lockfile.lock"), "other\n1\n").unwrap();

        let options = watch_in(&temp_dir)
            .poll_interval(Duration::from_millis(10))
            .wait_timeout(Duration::from_millis(60));
        let result = watch_call(options, "locked", || "done");

        assert_eq!(result, "locked");
    }

    #[test]
    fn wait_until_free_returns_immediately_when_free() {
        let temp_dir = TempDir::new().unwrap();
        let lock = LockFile::new(LockOptions::new().path(temp_dir.path()));

        let start = Instant::now();
        let free = wait_until_free(&lock, Duration::from_millis(50), Duration::from_secs(5));

        assert!(free);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
