//! On-disk vault file format and atomic writes.
//!
//! A vault file is a JSON envelope:
//!
//! ```text
//! {"format":"passvault","version":1,"records":[{label, token, created_at, updated_at}, ...]}
//! ```
//!
//! - **format**: fixed marker so an unrelated JSON file is not mistaken
//!   for a vault.
//! - **version**: envelope version (currently `1`).
//! - **records**: sealed records, sorted by label.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::record::SecretRecord;
use crate::errors::{Result, VaultError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Marker stored in the `format` field of every vault file.
pub const FORMAT_MARKER: &str = "passvault";

/// Current envelope version.
pub const CURRENT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    format: String,
    version: u32,
    records: Vec<SecretRecord>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Path of the temp file used while writing `path`.
///
/// Lives in the same directory so the final rename stays on one
/// filesystem.
pub fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

/// Read the records stored at `path`.
///
/// Returns `Ok(None)` when the file does not exist.  Any file that exists
/// but is not a well-formed vault envelope is `CorruptStore`.
pub fn read_vault(path: &Path) -> Result<Option<Vec<SecretRecord>>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let corrupt = |reason: String| VaultError::CorruptStore {
        path: path.to_path_buf(),
        reason,
    };

    let envelope: Envelope =
        serde_json::from_slice(&data).map_err(|e| corrupt(format!("invalid JSON: {e}")))?;

    if envelope.format != FORMAT_MARKER {
        return Err(corrupt(format!(
            "unexpected format marker '{}'",
            envelope.format
        )));
    }
    if envelope.version != CURRENT_VERSION {
        return Err(corrupt(format!(
            "unsupported version {}, expected {CURRENT_VERSION}",
            envelope.version
        )));
    }

    Ok(Some(envelope.records))
}

/// Write `records` to `path` **atomically**.
///
/// 1. Serialize the envelope to JSON.
/// 2. Write it to a temp file in the same directory and fsync it.
/// 3. Rename the temp file over the target path.
///
/// Readers see either the old file or the new one, never a mix.
pub fn write_vault(path: &Path, records: &[SecretRecord]) -> Result<()> {
    let envelope = Envelope {
        format: FORMAT_MARKER.to_string(),
        version: CURRENT_VERSION,
        records: records.to_vec(),
    };
    let buf = serde_json::to_vec_pretty(&envelope)
        .map_err(|e| VaultError::Serialization(format!("vault: {e}")))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path(path);
    // A temp file left by an interrupted save may carry another mode;
    // start from a fresh file so the 0600 mode below always applies.
    match fs::remove_file(&tmp_path) {
        Ok(()) => tracing::debug!(path = %tmp_path.display(), "removed stale temp file"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&tmp_path)?;
    file.write_all(&buf)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path)?;

    tracing::debug!(
        path = %path.display(),
        records = records.len(),
        "wrote vault file"
    );
    Ok(())
}
