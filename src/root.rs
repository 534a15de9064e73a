//! Process-wide root path configuration.
//!
//! Lock handles resolve their marker path against a directory. Callers can
//! pass that directory explicitly through [`LockOptions`](crate::lock::LockOptions),
//! or configure it once per process here and construct handles with
//! [`LockFile::at_configured_root`](crate::lock::LockFile::at_configured_root).
//!
//! The configuration is a single documented global with explicit lifecycle:
//! written only by [`set_root`], read only by [`get_root`], never mutated
//! implicitly by any other operation. The latest successful [`set_root`] wins;
//! a failed call leaves the previous value untouched.

use crate::error::{LockError, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::{LazyLock, RwLock};

static ROOT: LazyLock<RwLock<Option<PathBuf>>> = LazyLock::new(|| RwLock::new(None));

/// Set the process-wide root directory for lock files.
///
/// The path is tilde-expanded (`~` and `~user` prefixes) and canonicalized,
/// so relative segments and symlinks resolve to a real absolute path.
///
/// # Errors
///
/// Returns [`LockError::InvalidPath`] when the expanded path does not exist
/// or is not a directory. The previous configuration is left unchanged.
pub fn set_root(path: impl AsRef<str>) -> Result<()> {
    let raw = path.as_ref();
    let expanded = shellexpand::tilde(raw).into_owned();

    let resolved = fs::canonicalize(&expanded).map_err(|e| LockError::InvalidPath {
        path: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !resolved.is_dir() {
        return Err(LockError::InvalidPath {
            path: raw.to_string(),
            reason: "not a directory".to_string(),
        });
    }

    let mut root = ROOT.write().unwrap_or_else(|poison| poison.into_inner());
    *root = Some(resolved);
    Ok(())
}

/// Get the configured root directory.
///
/// # Errors
///
/// Returns [`LockError::NotConfigured`] before the first successful
/// [`set_root`] call.
pub fn get_root() -> Result<PathBuf> {
    let root = ROOT.read().unwrap_or_else(|poison| poison.into_inner());
    root.clone().ok_or(LockError::NotConfigured)
}

/// Clear the configuration so tests can exercise the unconfigured state.
#[cfg(test)]
pub(crate) fn reset_root() {
    let mut root = ROOT.write().unwrap_or_else(|poison| poison.into_inner());
    *root = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn set_root_accepts_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        set_root(temp_dir.path().to_str().unwrap()).unwrap();

        let root = get_root().unwrap();
        assert_eq!(root, temp_dir.path().canonicalize().unwrap());
    }

    #[test]
    #[serial]
    fn set_root_canonicalizes_relative_dot() {
        set_root(".").unwrap();

        let root = get_root().unwrap();
        assert!(root.is_absolute());
        assert_eq!(root, std::env::current_dir().unwrap().canonicalize().unwrap());
    }

    #[test]
    #[serial]
    fn set_root_expands_home_shortcut() {
        if std::env::var_os("HOME").is_none() {
            return;
        }
        set_root("~").unwrap();

        let root = get_root().unwrap();
        assert!(root.is_absolute());
        assert!(root.is_dir());
        // `~` must not survive expansion
        assert!(!root.to_string_lossy().contains('~'));
    }

    #[test]
    #[serial]
    fn set_root_rejects_missing_directory() {
        let result = set_root("/hoge/hoge");
        assert!(matches!(result, Err(LockError::InvalidPath { .. })));
    }

    #[test]
    #[serial]
    fn set_root_rejects_mid_path_home_shortcut() {
        // `~` is only expanded as a prefix; embedded it names a literal
        // (nonexistent) component and must fail validation.
        let result = set_root("/hoge/~/hoge");
        assert!(matches!(result, Err(LockError::InvalidPath { .. })));
    }

    #[test]
    #[serial]
    fn set_root_rejects_file_path() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("not_a_dir");
        std::fs::write(&file_path, "x").unwrap();

        let result = set_root(file_path.to_str().unwrap());
        assert!(matches!(result, Err(LockError::InvalidPath { .. })));
    }

    #[test]
    #[serial]
    fn failed_set_root_keeps_previous_value() {
        let temp_dir = TempDir::new().unwrap();
        set_root(temp_dir.path().to_str().unwrap()).unwrap();

        let result = set_root("/hoge/hoge");
        assert!(result.is_err());

        let root = get_root().unwrap();
        assert_eq!(root, temp_dir.path().canonicalize().unwrap());
    }

    #[test]
    #[serial]
    fn get_root_fails_before_configuration() {
        reset_root();

        let result = get_root();
        assert!(matches!(result, Err(LockError::NotConfigured)));
    }

    #[test]
    #[serial]
    fn latest_successful_set_root_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();

        set_root(first.path().to_str().unwrap()).unwrap();
        set_root(second.path().to_str().unwrap()).unwrap();

        let root = get_root().unwrap();
        assert_eq!(root, second.path().canonicalize().unwrap());
    }
}
