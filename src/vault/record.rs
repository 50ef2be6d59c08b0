//! SecretRecord and RecordMetadata types stored inside a vault.
//!
//! Each record holds its label (usually a website name), the sealed
//! credential token, and creation/update timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crypto::SealedToken;

/// A single sealed credential stored in the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    /// Unique label within the vault (e.g. "example.com").
    pub label: String,

    /// Sealed password (base64 in JSON).
    pub token: SealedToken,

    /// When this label was first stored.
    pub created_at: DateTime<Utc>,

    /// When this label was last overwritten.
    pub updated_at: DateTime<Utc>,
}

/// Label and timestamps only, for listing without touching tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMetadata {
    pub label: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&SecretRecord> for RecordMetadata {
    fn from(record: &SecretRecord) -> Self {
        Self {
            label: record.label.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
