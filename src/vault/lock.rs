//! Advisory lock serializing vault mutations across processes.
//!
//! On Unix a `flock(LOCK_EX)` is taken on a sibling `<vault>.lock` file
//! for the span load → mutate → save.  Other platforms fall back to a
//! no-op lock; the atomic rename in `format::write_vault` still keeps
//! readers from seeing a half-written file.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::errors::{Result, VaultError};

/// Path of the lock file guarding `vault_path`.
pub fn lock_path(vault_path: &Path) -> PathBuf {
    let mut name = vault_path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    vault_path.with_file_name(name)
}

/// Exclusive lock held until dropped.
#[derive(Debug)]
pub struct VaultLock {
    file: File,
    path: PathBuf,
}

impl VaultLock {
    /// Block until the exclusive lock for `vault_path` is acquired.
    pub fn acquire(vault_path: &Path) -> Result<Self> {
        let path = lock_path(vault_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| lock_err(&path, &e))?;
            }
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| lock_err(&path, &e))?;

        lock_exclusive(&file).map_err(|e| lock_err(&path, &e))?;
        tracing::trace!(path = %path.display(), "acquired vault lock");

        Ok(Self { file, path })
    }

    /// Try to take the lock without blocking; `None` if another process
    /// holds it.
    pub fn try_acquire(vault_path: &Path) -> Result<Option<Self>> {
        let path = lock_path(vault_path);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| lock_err(&path, &e))?;

        if try_lock_exclusive(&file).map_err(|e| lock_err(&path, &e))? {
            Ok(Some(Self { file, path }))
        } else {
            Ok(None)
        }
    }
}

impl Drop for VaultLock {
    fn drop(&mut self) {
        let _ = unlock(&self.file);
        tracing::trace!(path = %self.path.display(), "released vault lock");
    }
}

fn lock_err(path: &Path, err: &std::io::Error) -> VaultError {
    VaultError::Lock(format!("{}: {err}", path.display()))
}

// ── Unix flock ──────────────────────────────────────────────────────

#[cfg(unix)]
fn lock_exclusive(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;
    loop {
        // SAFETY: the descriptor is owned by `file` and open for the call.
        let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX) };
        if result == 0 {
            return Ok(());
        }
        let err = std::io::Error::last_os_error();
        if err.kind() != std::io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File) -> std::io::Result<bool> {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor is owned by `file` and open for the call.
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(true)
    } else {
        let err = std::io::Error::last_os_error();
        if err.kind() == std::io::ErrorKind::WouldBlock {
            Ok(false)
        } else {
            Err(err)
        }
    }
}

#[cfg(unix)]
fn unlock(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;
    // SAFETY: the descriptor is owned by `file` and open for the call.
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_UN) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

// ── Fallback ────────────────────────────────────────────────────────

#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> std::io::Result<()> {
    warn_unlocked();
    Ok(())
}

#[cfg(not(unix))]
fn try_lock_exclusive(_file: &File) -> std::io::Result<bool> {
    warn_unlocked();
    Ok(true)
}

/// Concurrent writers are not excluded on this platform; say so once.
#[cfg(not(unix))]
fn warn_unlocked() {
    static WARNED: std::sync::Once = std::sync::Once::new();
    WARNED.call_once(|| {
        tracing::warn!("advisory vault locking is unavailable on this platform");
    });
}

#[cfg(not(unix))]
fn unlock(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lock_path_appends_suffix() {
        assert_eq!(
            lock_path(Path::new("/data/passwords.json")),
            PathBuf::from("/data/passwords.json.lock")
        );
    }

    #[test]
    fn acquire_creates_lock_file() {
        let dir = TempDir::new().unwrap();
        let vault = dir.path().join("passwords.json");

        let _guard = VaultLock::acquire(&vault).unwrap();
        assert!(lock_path(&vault).exists());
    }

    #[cfg(unix)]
    #[test]
    fn second_lock_is_refused_until_release() {
        let dir = TempDir::new().unwrap();
        let vault = dir.path().join("passwords.json");

        let guard = VaultLock::acquire(&vault).unwrap();
        // flock locks belong to the open file description, so a second
        // open in the same process contends like another process would.
        assert!(VaultLock::try_acquire(&vault).unwrap().is_none());

        drop(guard);
        assert!(VaultLock::try_acquire(&vault).unwrap().is_some());
    }
}
