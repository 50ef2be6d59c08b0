//! End-to-end tests for the public vault operations.

use std::fs;
use std::path::Path;

use passvault::crypto::KeyStore;
use passvault::{PasswordVault, VaultConfig, VaultError};
use tempfile::TempDir;

fn config(dir: &Path) -> VaultConfig {
    VaultConfig::new(dir.join("key.key"), dir.join("passwords.json"))
}

#[test]
fn fresh_vault_add_and_retrieve() {
    let dir = TempDir::new().unwrap();
    let mut vault = PasswordVault::open(&config(dir.path())).unwrap();

    let stored = vault.add("example.com", Some("Secr3t!")).unwrap();
    assert_eq!(stored, "Secr3t!");

    assert_eq!(
        vault.retrieve("example.com").unwrap().as_deref(),
        Some("Secr3t!")
    );
    assert_eq!(vault.retrieve("unknown.com").unwrap(), None);
}

#[test]
fn open_creates_key_but_not_vault_file() {
    let dir = TempDir::new().unwrap();
    PasswordVault::open(&config(dir.path())).unwrap();

    assert!(dir.path().join("key.key").exists());
    assert!(!dir.path().join("passwords.json").exists());
}

#[test]
fn last_write_wins() {
    let dir = TempDir::new().unwrap();
    let mut vault = PasswordVault::open(&config(dir.path())).unwrap();

    vault.add("example.com", Some("first")).unwrap();
    vault.add("example.com", Some("second")).unwrap();

    assert_eq!(
        vault.retrieve("example.com").unwrap().as_deref(),
        Some("second")
    );
    assert_eq!(vault.list().len(), 1);
}

#[test]
fn autofill_matches_retrieve() {
    let dir = TempDir::new().unwrap();
    let mut vault = PasswordVault::open(&config(dir.path())).unwrap();
    vault.add("mail.example", Some("p@ss")).unwrap();

    assert_eq!(
        vault.autofill("mail.example").unwrap(),
        vault.retrieve("mail.example").unwrap()
    );
    assert_eq!(vault.autofill("missing").unwrap(), None);
}

#[test]
fn generated_password_is_stored_and_returned() {
    let dir = TempDir::new().unwrap();
    let mut vault = PasswordVault::open(&config(dir.path())).unwrap();

    let generated = vault.add("new.example", None).unwrap();
    assert_eq!(generated.len(), 12);
    assert_eq!(vault.retrieve("new.example").unwrap(), Some(generated));
}

#[test]
fn records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let mut vault = PasswordVault::open(&config(dir.path())).unwrap();
        vault.add("a.example", Some("alpha")).unwrap();
        vault.add("b.example", Some("beta")).unwrap();
    }

    let vault = PasswordVault::open(&config(dir.path())).unwrap();
    assert_eq!(vault.retrieve("a.example").unwrap().as_deref(), Some("alpha"));
    assert_eq!(vault.retrieve("b.example").unwrap().as_deref(), Some("beta"));
}

#[test]
fn plaintext_is_not_persisted() {
    let dir = TempDir::new().unwrap();
    let mut vault = PasswordVault::open(&config(dir.path())).unwrap();
    vault.add("example.com", Some("Secr3t!")).unwrap();

    let raw = fs::read_to_string(dir.path().join("passwords.json")).unwrap();
    assert!(!raw.contains("Secr3t!"));
}

#[test]
fn two_handles_do_not_lose_updates() {
    let dir = TempDir::new().unwrap();
    let mut first = PasswordVault::open(&config(dir.path())).unwrap();
    let mut second = PasswordVault::open(&config(dir.path())).unwrap();

    first.add("one.example", Some("1")).unwrap();
    // `second` opened before the first write; its save must not drop it.
    second.add("two.example", Some("2")).unwrap();

    let reopened = PasswordVault::open(&config(dir.path())).unwrap();
    assert_eq!(reopened.list().len(), 2);
    assert_eq!(reopened.retrieve("one.example").unwrap().as_deref(), Some("1"));
    assert_eq!(reopened.retrieve("two.example").unwrap().as_deref(), Some("2"));
}

#[test]
fn delete_removes_and_persists() {
    let dir = TempDir::new().unwrap();
    let mut vault = PasswordVault::open(&config(dir.path())).unwrap();
    vault.add("gone.example", Some("x")).unwrap();

    assert!(vault.delete("gone.example").unwrap());
    assert_eq!(vault.retrieve("gone.example").unwrap(), None);

    let reopened = PasswordVault::open(&config(dir.path())).unwrap();
    assert!(!reopened.contains("gone.example"));
}

#[test]
fn wrong_key_is_integrity_error_not_not_found() {
    let dir = TempDir::new().unwrap();
    {
        let mut vault = PasswordVault::open(&config(dir.path())).unwrap();
        vault.add("example.com", Some("Secr3t!")).unwrap();
    }

    // Point at a different key; the record is present but cannot be opened.
    let other = VaultConfig::new(
        dir.path().join("other.key"),
        dir.path().join("passwords.json"),
    );
    let vault = PasswordVault::open(&other).unwrap();
    assert!(matches!(
        vault.retrieve("example.com"),
        Err(VaultError::Integrity)
    ));
    assert_eq!(vault.retrieve("unknown.com").unwrap(), None);
}

#[test]
fn corrupt_key_file_blocks_open() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("key.key"), [0u8; 7]).unwrap();

    assert!(matches!(
        PasswordVault::open(&config(dir.path())),
        Err(VaultError::KeyLoad { .. })
    ));
}

#[test]
fn corrupt_vault_file_blocks_open() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("passwords.json"), "{ not a vault").unwrap();

    assert!(matches!(
        PasswordVault::open(&config(dir.path())),
        Err(VaultError::CorruptStore { .. })
    ));
}

#[test]
fn generate_rejects_zero_length() {
    let dir = TempDir::new().unwrap();
    let vault = PasswordVault::open(&config(dir.path())).unwrap();

    assert!(matches!(
        vault.generate(Some(0)),
        Err(VaultError::InvalidLength(0))
    ));
    assert_eq!(vault.generate(Some(40)).unwrap().len(), 40);
}

#[test]
fn status_fingerprint_matches_key_file() {
    let dir = TempDir::new().unwrap();
    let vault = PasswordVault::open(&config(dir.path())).unwrap();
    let key = KeyStore::load_or_create(&dir.path().join("key.key")).unwrap();

    assert_eq!(vault.status().key_fingerprint, key.fingerprint());
}
