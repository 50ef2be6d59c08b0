use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in PassVault.
///
/// Messages never carry plaintext passwords or key material.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Key errors ---
    #[error("Key file at {path} is unusable: {reason}")]
    KeyLoad { path: PathBuf, reason: String },

    #[error("Could not create key file at {path}: {reason}")]
    KeyCreate { path: PathBuf, reason: String },

    // --- Crypto errors ---
    #[error("Integrity check failed — wrong key or tampered data")]
    Integrity,

    #[error("Malformed sealed token: {0}")]
    Format(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    // --- Store errors ---
    #[error("Vault file at {path} is corrupt: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Could not lock vault: {0}")]
    Lock(String),

    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    // --- Generator errors ---
    #[error("Password length must be at least 1 (got {0})")]
    InvalidLength(usize),

    #[error("No character classes selected for password generation")]
    EmptyAlphabet,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("No password stored for '{0}'")]
    LabelNotFound(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
