//! Simplelock: cross-process mutual exclusion using marker files.
//!
//! A lock is the presence of a marker file at a well-known path. Any set of
//! threads, processes, or machines that can see the same filesystem can
//! coordinate through it: creating the marker with exclusive-create
//! semantics acquires the lock, removing it releases. Marker content
//! (hostname and pid) is informational only; lock state is decided by
//! existence alone.
//!
//! Entry points, from lowest to highest level:
//! - [`lock::LockFile`] - the handle: non-blocking [`acquire`](lock::LockFile::acquire),
//!   [`release`](lock::LockFile::release), observation, and forced breakage.
//! - [`lock::LockFile::try_guard`] - RAII scoped acquisition.
//! - [`wrap::guarded_call`] - bracket a callable with acquire/release, with
//!   a fallback value on contention.
//! - [`watch::watch_call`] - gate a callable on current lock state without
//!   acquiring.
//! - [`root`] - optional process-wide root directory for lock files.
//!
//! # Example
//!
//! ```no_run
//! use simplelock::lock::{LockFile, LockOptions};
//!
//! # fn main() -> simplelock::error::Result<()> {
//! let mut lock = LockFile::new(LockOptions::new().name("import.lock").path("/var/run/app"));
//! match lock.try_guard()? {
//!     Some(_guard) => {
//!         // critical section; released when the guard drops
//!     }
//!     None => {
//!         // contended; take the fallback path
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! This is a local lock, not a distributed lock service: there is no lease,
//! heartbeat, or waiter queue, and a marker left by a crashed process must
//! be detected and broken by an operator (see [`lock::LockFile::holder`]
//! and [`lock::LockFile::break_lock`]).

pub mod error;
pub mod lock;
pub mod root;
pub mod watch;
pub mod wrap;

pub use error::{LockError, Result};
pub use lock::{Acquire, DEFAULT_LOCK_NAME, HolderInfo, LockFile, LockGuard, LockOptions};
pub use root::{get_root, set_root};
pub use watch::{WatchOptions, wait_until_free, watch_call};
pub use wrap::guarded_call;
