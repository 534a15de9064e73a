//! Marker-file locking subsystem.
//!
//! A lock is the presence of a marker file at `{path}/{name}`. Acquisition
//! creates the marker with **create_new** (exclusive create) semantics, so
//! only one concurrent attempt can succeed regardless of whether the
//! contenders are threads, processes, or machines sharing a filesystem.
//! Release removes the marker.
//!
//! # Marker Files
//!
//! Marker content is two lines of plain text, hostname then process id,
//! written best-effort at creation. It is purely informational: every lock
//! state decision is based on the file's existence, never its content, so a
//! partially written payload can never corrupt lock state.
//!
//! # Stale Locks
//!
//! A marker left behind by a crashed holder is indistinguishable from a
//! live lock by existence alone. [`LockFile::holder`] exposes the recorded
//! identity for triage and [`LockFile::break_lock`] force-removes the
//! marker; no lease or expiry mechanism exists.
//!
//! # RAII Guards
//!
//! [`LockFile::try_guard`] scopes an acquisition to a lexical region. The
//! guard releases on drop; if deletion fails during drop, a warning is
//! logged but the program does not crash.

mod guard;
mod handle;
mod types;


// Re-export public API
pub use guard::LockGuard;
pub use handle::LockFile;
pub use types::{Acquire, DEFAULT_LOCK_NAME, HolderInfo, LockOptions};
