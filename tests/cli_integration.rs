//! Integration tests for the PassVault CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! The interactive menu needs a terminal, so we stick to subcommands
//! with inline or piped input.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// Helper: a Command for the passvault binary running inside `dir`.
fn passvault(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("passvault").expect("binary should exist");
    cmd.current_dir(dir.path())
        .env_remove("PASSVAULT_KEY_FILE")
        .env_remove("PASSVAULT_VAULT_FILE")
        .env_remove("PASSVAULT_LOG");
    cmd
}

#[test]
fn help_flag_shows_usage() {
    let tmp = TempDir::new().unwrap();
    passvault(&tmp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Local encrypted password vault"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("autofill"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn version_flag_shows_version() {
    let tmp = TempDir::new().unwrap();
    passvault(&tmp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("passvault"));
}

#[test]
fn generate_prints_requested_length() {
    let tmp = TempDir::new().unwrap();
    let out = passvault(&tmp)
        .args(["generate", "--length", "16"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let password = String::from_utf8(out).unwrap();
    assert_eq!(password.trim_end_matches('\n').chars().count(), 16);

    // Generating never creates vault files.
    tmp.child("key.key").assert(predicate::path::missing());
    tmp.child("passwords.json").assert(predicate::path::missing());
}

#[test]
fn generate_digits_only() {
    let tmp = TempDir::new().unwrap();
    let out = passvault(&tmp)
        .args([
            "generate",
            "--length",
            "30",
            "--no-upper",
            "--no-lower",
            "--no-punctuation",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let password = String::from_utf8(out).unwrap();
    let password = password.trim_end_matches('\n');
    assert_eq!(password.len(), 30);
    assert!(password.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn generate_zero_length_fails() {
    let tmp = TempDir::new().unwrap();
    passvault(&tmp)
        .args(["generate", "--length", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn add_then_get_roundtrip() {
    let tmp = TempDir::new().unwrap();

    passvault(&tmp)
        .args(["add", "example.com", "Secr3t!"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Password for example.com saved."));

    tmp.child("key.key").assert(predicate::path::exists());
    let stored = std::fs::read_to_string(tmp.child("passwords.json").path()).unwrap();
    assert!(stored.contains("example.com"));
    assert!(!stored.contains("Secr3t!"));

    passvault(&tmp)
        .args(["get", "example.com"])
        .assert()
        .success()
        .stdout("Secr3t!\n");
}

#[test]
fn get_unknown_label_fails() {
    let tmp = TempDir::new().unwrap();
    passvault(&tmp)
        .args(["get", "unknown.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No password stored for 'unknown.com'"));
}

#[test]
fn add_reads_piped_stdin() {
    let tmp = TempDir::new().unwrap();

    passvault(&tmp)
        .args(["add", "piped.example"])
        .write_stdin("from-a-pipe\n")
        .assert()
        .success();

    passvault(&tmp)
        .args(["get", "piped.example"])
        .assert()
        .success()
        .stdout("from-a-pipe\n");
}

#[test]
fn add_with_empty_input_generates() {
    let tmp = TempDir::new().unwrap();

    passvault(&tmp)
        .args(["add", "gen.example", "--length", "20"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated password:"));

    let out = passvault(&tmp)
        .args(["get", "gen.example"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(String::from_utf8(out).unwrap().trim_end().len(), 20);
}

#[test]
fn add_with_blank_label_fails_before_generating() {
    let tmp = TempDir::new().unwrap();

    passvault(&tmp)
        .args(["add", " "])
        .write_stdin("")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Generated password:").not())
        .stderr(predicate::str::contains("Invalid label"));

    tmp.child("passwords.json").assert(predicate::path::missing());
}

#[test]
fn autofill_prints_label_and_password() {
    let tmp = TempDir::new().unwrap();
    passvault(&tmp)
        .args(["add", "example.com", "Secr3t!"])
        .assert()
        .success();

    passvault(&tmp)
        .args(["autofill", "example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Autofill for example.com: Secr3t!"));
}

#[test]
fn overwrite_reports_update() {
    let tmp = TempDir::new().unwrap();
    passvault(&tmp)
        .args(["add", "example.com", "one"])
        .assert()
        .success();

    passvault(&tmp)
        .args(["add", "example.com", "two"])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated"));

    passvault(&tmp)
        .args(["get", "example.com"])
        .assert()
        .success()
        .stdout("two\n");
}

#[test]
fn delete_force_then_get_fails() {
    let tmp = TempDir::new().unwrap();
    passvault(&tmp)
        .args(["add", "old.example", "x"])
        .assert()
        .success();

    passvault(&tmp)
        .args(["delete", "old.example", "--force"])
        .assert()
        .success();

    passvault(&tmp)
        .args(["get", "old.example"])
        .assert()
        .failure();
}

#[test]
fn list_shows_labels() {
    let tmp = TempDir::new().unwrap();
    passvault(&tmp)
        .args(["add", "listed.example", "x"])
        .assert()
        .success();

    passvault(&tmp)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("listed.example"));
}

#[test]
fn custom_paths_from_flags() {
    let tmp = TempDir::new().unwrap();
    passvault(&tmp)
        .args([
            "--key-file",
            "secrets/vault.key",
            "--vault-file",
            "secrets/vault.json",
            "add",
            "example.com",
            "pw",
        ])
        .assert()
        .success();

    tmp.child("secrets/vault.key").assert(predicate::path::exists());
    tmp.child("secrets/vault.json").assert(predicate::path::exists());
    tmp.child("key.key").assert(predicate::path::missing());
}

#[test]
fn custom_paths_from_config_file() {
    let tmp = TempDir::new().unwrap();
    tmp.child(".passvault.toml")
        .write_str("key_file = \"my.key\"\nvault_file = \"my.json\"\n")
        .unwrap();

    passvault(&tmp)
        .args(["add", "example.com", "pw"])
        .assert()
        .success();

    tmp.child("my.key").assert(predicate::path::exists());
    tmp.child("my.json").assert(predicate::path::exists());
}

#[test]
fn corrupt_key_file_is_reported() {
    let tmp = TempDir::new().unwrap();
    tmp.child("key.key").write_binary(&[1, 2, 3]).unwrap();

    passvault(&tmp)
        .args(["get", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Key file"));
}
