//! The public vault operations.
//!
//! `PasswordVault` is the handle the CLI (or any other caller) threads
//! through every operation.  Opening one loads the key exactly once and
//! reads the current vault file; a handle that exists is always ready.
//!
//! Mutating operations take the advisory lock, reload the file so that
//! another process's writes are not lost, apply the change, save, and
//! release the lock.

use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::crypto::{AuthenticatedCipher, KeyStore};
use crate::errors::Result;
use crate::generator::{CharClasses, PasswordGenerator};
use crate::vault::{validate_label, RecordMetadata, Vault, VaultStore};

/// Where the key and the vault live, plus generator defaults.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    pub key_path: PathBuf,
    pub vault_path: PathBuf,
    pub password_length: usize,
    pub classes: CharClasses,
}

impl VaultConfig {
    /// Default names and generator settings for the given file paths.
    pub fn new(key_path: impl Into<PathBuf>, vault_path: impl Into<PathBuf>) -> Self {
        let defaults = Settings::default();
        Self {
            key_path: key_path.into(),
            vault_path: vault_path.into(),
            password_length: defaults.password_length,
            classes: defaults.char_classes(),
        }
    }

    /// Resolve `settings` against `base` (normally the working directory).
    pub fn from_settings(settings: &Settings, base: &Path) -> Self {
        Self {
            key_path: settings.key_path(base),
            vault_path: settings.vault_path(base),
            password_length: settings.password_length,
            classes: settings.char_classes(),
        }
    }
}

/// Non-secret summary of an open vault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultStatus {
    pub key_path: PathBuf,
    pub vault_path: PathBuf,
    pub key_fingerprint: String,
    pub record_count: usize,
}

/// An open, ready-to-use password vault.
pub struct PasswordVault {
    cipher: AuthenticatedCipher,
    store: VaultStore,
    vault: Vault,
    generator: PasswordGenerator,
    password_length: usize,
    key_path: PathBuf,
    key_fingerprint: String,
}

impl PasswordVault {
    /// Load (or create) the key and read the vault file.
    pub fn open(config: &VaultConfig) -> Result<Self> {
        let generator = PasswordGenerator::new(config.classes)?;

        let key = KeyStore::load_or_create(&config.key_path)?;
        let key_fingerprint = key.fingerprint();
        let cipher = AuthenticatedCipher::new(&key);
        drop(key);

        let store = VaultStore::new(&config.vault_path);
        let vault = store.load()?;

        tracing::info!(
            vault = %config.vault_path.display(),
            records = vault.len(),
            "vault ready"
        );

        Ok(Self {
            cipher,
            store,
            vault,
            generator,
            password_length: config.password_length,
            key_path: config.key_path.clone(),
            key_fingerprint,
        })
    }

    /// Store a password for `label`, generating one when `password` is
    /// `None`.  Returns the stored plaintext so callers can show a
    /// generated value.
    pub fn add(&mut self, label: &str, password: Option<&str>) -> Result<String> {
        match password {
            Some(p) => {
                validate_label(label)?;
                self.store_sealed(label, p.to_string(), false)
            }
            None => self.add_generated(label, None),
        }
    }

    /// Generate a password of `length` (default: the configured length),
    /// store it under `label` and return it.
    ///
    /// The label is checked before anything is generated.
    pub fn add_generated(&mut self, label: &str, length: Option<usize>) -> Result<String> {
        validate_label(label)?;
        let plaintext = self.generate(length)?;
        self.store_sealed(label, plaintext, true)
    }

    fn store_sealed(&mut self, label: &str, plaintext: String, generated: bool) -> Result<String> {
        let token = self.cipher.seal(&plaintext)?;
        self.mutate(|vault| vault.upsert(label, token))?;
        tracing::info!(label, generated, "stored password");
        Ok(plaintext)
    }

    /// Decrypt the password stored for `label`.
    ///
    /// `Ok(None)` means no such label; integrity or format failures are
    /// errors.
    pub fn retrieve(&self, label: &str) -> Result<Option<String>> {
        match self.vault.get(label) {
            Some(token) => {
                let plaintext = self.cipher.open(token)?;
                tracing::debug!(label, "retrieved password");
                Ok(Some(plaintext))
            }
            None => {
                tracing::debug!(label, "label not found");
                Ok(None)
            }
        }
    }

    /// Same as `retrieve`; the caller presents the value at the point of
    /// use (print or clipboard).
    pub fn autofill(&self, label: &str) -> Result<Option<String>> {
        tracing::debug!(label, "autofill requested");
        self.retrieve(label)
    }

    /// Length used when a caller does not ask for one.
    pub fn password_length(&self) -> usize {
        self.password_length
    }

    /// Generate a random password; `None` uses the configured length.
    pub fn generate(&self, length: Option<usize>) -> Result<String> {
        self.generator
            .generate(length.unwrap_or(self.password_length))
    }

    /// Remove `label`.  Returns whether it existed.
    pub fn delete(&mut self, label: &str) -> Result<bool> {
        let removed = self.mutate(|vault| Ok(vault.remove(label).is_some()))?;
        tracing::info!(label, removed, "delete requested");
        Ok(removed)
    }

    /// Labels with timestamps, sorted; nothing is decrypted.
    pub fn list(&self) -> Vec<RecordMetadata> {
        self.vault.list()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.vault.contains(label)
    }

    pub fn status(&self) -> VaultStatus {
        VaultStatus {
            key_path: self.key_path.clone(),
            vault_path: self.store.path().to_path_buf(),
            key_fingerprint: self.key_fingerprint.clone(),
            record_count: self.vault.len(),
        }
    }

    /// Lock, reload, apply `change`, save only if it succeeded, unlock.
    fn mutate<T>(&mut self, change: impl FnOnce(&mut Vault) -> Result<T>) -> Result<T> {
        let _lock = self.store.lock()?;

        let mut vault = self.store.load()?;
        let outcome = change(&mut vault)?;
        self.store.save(&vault)?;

        self.vault = vault;
        Ok(outcome)
    }
}
