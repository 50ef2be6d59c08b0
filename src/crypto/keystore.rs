//! Long-term vault key storage.
//!
//! The key file holds exactly 32 raw random bytes.  It is created once,
//! on first run, with owner-only permissions and is never rewritten
//! afterwards: every sealed token in the vault depends on it.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use aes_gcm::aead::{KeyInit, OsRng};
use aes_gcm::Aes256Gcm;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::errors::{Result, VaultError};

/// Length of the vault key in bytes (256 bits, for AES-256-GCM).
pub const KEY_LEN: usize = 32;

/// Number of SHA-256 bytes shown in a key fingerprint.
const FINGERPRINT_LEN: usize = 8;

/// A 32-byte vault key that zeroes its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Key {
    bytes: [u8; KEY_LEN],
}

impl Key {
    /// Wrap raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Generate a fresh key from the operating system's CSPRNG.
    pub fn generate() -> Self {
        let generated = Aes256Gcm::generate_key(&mut OsRng);
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(generated.as_slice());
        Self { bytes }
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Short, non-reversible identifier for this key.
    ///
    /// Hex of the first 8 bytes of SHA-256 over the key.  Safe to print.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.bytes);
        digest[..FINGERPRINT_LEN]
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect()
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Key {}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Key")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Loads the vault key from disk, creating it on first use.
pub struct KeyStore;

impl KeyStore {
    /// Return the key stored at `path`, generating and persisting a new
    /// one if no file exists yet.
    ///
    /// An existing file is never overwritten.  A file of the wrong length
    /// or one that cannot be read is a `KeyLoad` error; the caller must
    /// not continue with some other key.
    pub fn load_or_create(path: &Path) -> Result<Key> {
        match fs::read(path) {
            Ok(data) => Self::parse(path, data),
            Err(e) if e.kind() == ErrorKind::NotFound => Self::create(path),
            Err(e) => Err(VaultError::KeyLoad {
                path: path.to_path_buf(),
                reason: format!("cannot read key file: {e}"),
            }),
        }
    }

    /// Load an existing key file; a missing file is an error.
    pub fn load(path: &Path) -> Result<Key> {
        let data = fs::read(path).map_err(|e| VaultError::KeyLoad {
            path: path.to_path_buf(),
            reason: format!("cannot read key file: {e}"),
        })?;
        Self::parse(path, data)
    }

    fn parse(path: &Path, mut data: Vec<u8>) -> Result<Key> {
        if data.len() != KEY_LEN {
            let len = data.len();
            data.zeroize();
            return Err(VaultError::KeyLoad {
                path: path.to_path_buf(),
                reason: format!("key must be exactly {KEY_LEN} bytes, got {len}"),
            });
        }

        warn_if_permissive(path);

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&data);
        data.zeroize();
        let key = Key::from_bytes(bytes);
        bytes.zeroize();

        tracing::debug!(path = %path.display(), "loaded vault key");
        Ok(key)
    }

    fn create(path: &Path) -> Result<Key> {
        let create_err = |reason: String| VaultError::KeyCreate {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| create_err(format!("cannot create key directory: {e}")))?;
            }
        }

        // Write the full key to a private sibling first, then publish it
        // with a hard link, which fails instead of replacing an existing
        // key. Readers never see a partially written key file.
        let tmp_path = staging_path(path);
        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let key = Key::generate();
        let staged = options
            .open(&tmp_path)
            .and_then(|mut file| {
                file.write_all(key.as_bytes())?;
                file.sync_all()
            })
            .map_err(|e| create_err(format!("failed to write key file: {e}")));
        if let Err(e) = staged {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        let published = fs::hard_link(&tmp_path, path);
        let _ = fs::remove_file(&tmp_path);
        match published {
            Ok(()) => {}
            // Another process published its key first; use that one.
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!(path = %path.display(), "key created concurrently, re-reading");
                return Self::load(path);
            }
            Err(e) => return Err(create_err(format!("cannot create key file: {e}"))),
        }

        tracing::info!(
            path = %path.display(),
            fingerprint = %key.fingerprint(),
            "created new vault key"
        );
        Ok(key)
    }
}

/// Unique hidden sibling of `path` used to stage a new key.
fn staging_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    let name = path.file_name().unwrap_or_default().to_string_lossy();
    parent.join(format!(
        ".{name}.{}.{:016x}.tmp",
        std::process::id(),
        rand::random::<u64>()
    ))
}

/// Log a warning when the key file is readable by group or others.
fn warn_if_permissive(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(meta) = fs::metadata(path) {
            let mode = meta.permissions().mode();
            if mode & 0o077 != 0 {
                tracing::warn!(
                    path = %path.display(),
                    mode = format!("{:o}", mode & 0o777),
                    "key file is accessible by other users"
                );
            }
        }
    }
    #[cfg(not(unix))]
    let _ = path;
}
