//! In-memory vault mapping and its persistence.
//!
//! `Vault` owns the label → record map.  `VaultStore` knows where the
//! vault lives on disk and loads or saves it as a whole; there are no
//! partial updates.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::crypto::SealedToken;
use crate::errors::{Result, VaultError};

use super::format;
use super::lock::VaultLock;
use super::record::{RecordMetadata, SecretRecord};

/// Maximum label length in characters.
const MAX_LABEL_LEN: usize = 256;

/// The in-memory mapping of labels to sealed records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vault {
    records: HashMap<String, SecretRecord>,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vault from the records read from `source`.
    ///
    /// A duplicate label means the file was not written by us and is
    /// `CorruptStore`.
    pub fn from_records(source: &Path, records: Vec<SecretRecord>) -> Result<Self> {
        let mut map = HashMap::with_capacity(records.len());
        for record in records {
            let label = record.label.clone();
            if map.insert(label.clone(), record).is_some() {
                return Err(VaultError::CorruptStore {
                    path: source.to_path_buf(),
                    reason: format!("duplicate label '{label}'"),
                });
            }
        }
        Ok(Self { records: map })
    }

    /// Set or overwrite the token for `label`.
    ///
    /// An overwrite keeps the record's original `created_at`.
    pub fn upsert(&mut self, label: &str, token: SealedToken) -> Result<()> {
        validate_label(label)?;

        let now = Utc::now();
        let created_at = self
            .records
            .get(label)
            .map_or(now, |existing| existing.created_at);

        self.records.insert(
            label.to_string(),
            SecretRecord {
                label: label.to_string(),
                token,
                created_at,
                updated_at: now,
            },
        );
        Ok(())
    }

    /// Look up the token for `label`.  Absence is not an error.
    pub fn get(&self, label: &str) -> Option<&SealedToken> {
        self.records.get(label).map(|r| &r.token)
    }

    /// Remove `label`, returning its record if it was present.
    pub fn remove(&mut self, label: &str) -> Option<SecretRecord> {
        self.records.remove(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.records.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Metadata for every record, sorted by label.
    pub fn list(&self) -> Vec<RecordMetadata> {
        let mut list: Vec<RecordMetadata> =
            self.records.values().map(RecordMetadata::from).collect();
        list.sort_by(|a, b| a.label.cmp(&b.label));
        list
    }

    /// Records sorted by label, for deterministic output.
    fn sorted_records(&self) -> Vec<SecretRecord> {
        let mut list: Vec<SecretRecord> = self.records.values().cloned().collect();
        list.sort_by(|a, b| a.label.cmp(&b.label));
        list
    }
}

/// Persistence handle for a vault file.
#[derive(Debug, Clone)]
pub struct VaultStore {
    path: PathBuf,
}

impl VaultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the vault from disk.
    ///
    /// A missing file yields an empty vault; an unreadable one is
    /// `CorruptStore` and is never silently replaced.
    pub fn load(&self) -> Result<Vault> {
        let Some(records) = format::read_vault(&self.path)? else {
            tracing::debug!(path = %self.path.display(), "no vault file yet, starting empty");
            return Ok(Vault::new());
        };

        let vault = Vault::from_records(&self.path, records)?;

        tracing::debug!(
            path = %self.path.display(),
            records = vault.len(),
            "loaded vault"
        );
        Ok(vault)
    }

    /// Replace the file on disk with the full contents of `vault`.
    pub fn save(&self, vault: &Vault) -> Result<()> {
        format::write_vault(&self.path, &vault.sorted_records())
    }

    /// Take the cross-process lock guarding this vault file.
    pub fn lock(&self) -> Result<VaultLock> {
        VaultLock::acquire(&self.path)
    }
}

/// Labels must be non-blank, at most 256 characters, and free of
/// control characters.
pub fn validate_label(label: &str) -> Result<()> {
    if label.trim().is_empty() {
        return Err(VaultError::InvalidLabel("label cannot be empty".into()));
    }
    if label.chars().count() > MAX_LABEL_LEN {
        return Err(VaultError::InvalidLabel(format!(
            "label cannot exceed {MAX_LABEL_LEN} characters"
        )));
    }
    if label.chars().any(char::is_control) {
        return Err(VaultError::InvalidLabel(
            "label cannot contain control characters".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(byte: u8) -> SealedToken {
        SealedToken::from_bytes(vec![byte; 40])
    }

    #[test]
    fn upsert_then_get() {
        let mut vault = Vault::new();
        vault.upsert("example.com", token(1)).unwrap();
        assert_eq!(vault.get("example.com"), Some(&token(1)));
        assert_eq!(vault.get("other.com"), None);
    }

    #[test]
    fn upsert_overwrites_and_keeps_created_at() {
        let mut vault = Vault::new();
        vault.upsert("example.com", token(1)).unwrap();
        let created = vault.list()[0].created_at;

        vault.upsert("example.com", token(2)).unwrap();
        assert_eq!(vault.len(), 1);
        assert_eq!(vault.get("example.com"), Some(&token(2)));

        let meta = &vault.list()[0];
        assert_eq!(meta.created_at, created);
        assert!(meta.updated_at >= created);
    }

    #[test]
    fn remove_reports_presence() {
        let mut vault = Vault::new();
        vault.upsert("a", token(1)).unwrap();
        assert!(vault.remove("a").is_some());
        assert!(vault.remove("a").is_none());
        assert!(vault.is_empty());
    }

    #[test]
    fn list_is_sorted() {
        let mut vault = Vault::new();
        for label in ["zeta.io", "alpha.org", "mid.net"] {
            vault.upsert(label, token(0)).unwrap();
        }
        let labels: Vec<String> = vault.list().into_iter().map(|m| m.label).collect();
        assert_eq!(labels, vec!["alpha.org", "mid.net", "zeta.io"]);
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let now = Utc::now();
        let record = SecretRecord {
            label: "dup".into(),
            token: token(1),
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            Vault::from_records(Path::new("v.json"), vec![record.clone(), record]),
            Err(VaultError::CorruptStore { .. })
        ));
    }

    #[test]
    fn label_validation() {
        assert!(validate_label("example.com").is_ok());
        assert!(validate_label("My Bank (personal)").is_ok());
        assert!(validate_label("").is_err());
        assert!(validate_label("   ").is_err());
        assert!(validate_label("bad\nlabel").is_err());
        assert!(validate_label(&"x".repeat(MAX_LABEL_LEN + 1)).is_err());
    }
}
