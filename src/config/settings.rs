use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};
use crate::generator::{CharClasses, DEFAULT_LENGTH};

/// Project-level configuration, loaded from `.passvault.toml`.
///
/// Every field has a sensible default so PassVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Path of the raw key file (relative paths resolve against the
    /// working directory).
    #[serde(default = "default_key_file")]
    pub key_file: PathBuf,

    /// Path of the sealed vault file.
    #[serde(default = "default_vault_file")]
    pub vault_file: PathBuf,

    /// Length of generated passwords when none is given.
    #[serde(default = "default_password_length")]
    pub password_length: usize,

    #[serde(default = "enabled")]
    pub uppercase: bool,

    #[serde(default = "enabled")]
    pub lowercase: bool,

    #[serde(default = "enabled")]
    pub digits: bool,

    #[serde(default = "enabled")]
    pub punctuation: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_key_file() -> PathBuf {
    PathBuf::from("key.key")
}

fn default_vault_file() -> PathBuf {
    PathBuf::from("passwords.json")
}

fn default_password_length() -> usize {
    DEFAULT_LENGTH
}

fn enabled() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_file: default_key_file(),
            vault_file: default_vault_file(),
            password_length: default_password_length(),
            uppercase: true,
            lowercase: true,
            digits: true,
            punctuation: true,
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".passvault.toml";

    /// Load settings from `<dir>/.passvault.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        if settings.password_length == 0 {
            return Err(VaultError::Config(format!(
                "{}: password_length must be at least 1",
                config_path.display()
            )));
        }

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Key file path resolved against `base`.
    pub fn key_path(&self, base: &Path) -> PathBuf {
        resolve(base, &self.key_file)
    }

    /// Vault file path resolved against `base`.
    pub fn vault_path(&self, base: &Path) -> PathBuf {
        resolve(base, &self.vault_file)
    }

    /// Character classes for the password generator.
    pub fn char_classes(&self) -> CharClasses {
        CharClasses {
            uppercase: self.uppercase,
            lowercase: self.lowercase,
            digits: self.digits,
            punctuation: self.punctuation,
        }
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
