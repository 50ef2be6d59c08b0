//! Vault module — sealed credential storage.
//!
//! This module provides:
//! - `SecretRecord` and `RecordMetadata` types (`record`)
//! - Versioned JSON file format with atomic writes (`format`)
//! - Cross-process advisory locking (`lock`)
//! - The in-memory `Vault` and its `VaultStore` (`store`)

pub mod format;
pub mod lock;
pub mod record;
pub mod store;

// Re-export the most commonly used items.
pub use lock::VaultLock;
pub use record::{RecordMetadata, SecretRecord};
pub use store::{validate_label, Vault, VaultStore};
