//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::generator::CharClasses;
use crate::service::{PasswordVault, VaultConfig};

/// PassVault CLI: local encrypted password vault.
#[derive(Parser)]
#[command(name = "passvault", about = "Local encrypted password vault", version)]
pub struct Cli {
    /// Command to run (opens the interactive menu when omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to the key file (default: key.key)
    #[arg(long, env = "PASSVAULT_KEY_FILE", global = true)]
    pub key_file: Option<PathBuf>,

    /// Path to the vault file (default: passwords.json)
    #[arg(long, env = "PASSVAULT_VAULT_FILE", global = true)]
    pub vault_file: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Store a password (add or overwrite)
    Add {
        /// Label, usually the website (e.g. example.com)
        label: String,
        /// Password (omit for prompt or stdin; empty generates one)
        password: Option<String>,
        /// Length of a generated password
        #[arg(short, long)]
        length: Option<usize>,
    },

    /// Print a stored password
    Get {
        /// Label to look up
        label: String,
    },

    /// Show a stored password for use at a login form
    Autofill {
        /// Label to look up
        label: String,
        /// Copy to the clipboard instead of printing
        #[arg(short, long)]
        copy: bool,
    },

    /// Generate a random password without storing it
    Generate {
        /// Password length
        #[arg(short, long)]
        length: Option<usize>,
        #[command(flatten)]
        classes: ClassArgs,
    },

    /// Delete a stored password
    Delete {
        /// Label to delete
        label: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List stored labels
    List,

    /// Show key fingerprint, file paths, and record count
    Status,

    /// Interactive menu
    Menu,
}

/// Character-class switches for `generate`.
#[derive(clap::Args, Debug, Clone, Copy, Default)]
pub struct ClassArgs {
    /// Exclude uppercase letters
    #[arg(long)]
    pub no_upper: bool,
    /// Exclude lowercase letters
    #[arg(long)]
    pub no_lower: bool,
    /// Exclude digits
    #[arg(long)]
    pub no_digits: bool,
    /// Exclude punctuation
    #[arg(long)]
    pub no_punctuation: bool,
}

impl ClassArgs {
    /// Apply the exclusions on top of the configured classes.
    pub fn apply(&self, base: CharClasses) -> CharClasses {
        CharClasses {
            uppercase: base.uppercase && !self.no_upper,
            lowercase: base.lowercase && !self.no_lower,
            digits: base.digits && !self.no_digits,
            punctuation: base.punctuation && !self.no_punctuation,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Build the vault configuration: `.passvault.toml` in the working
/// directory, overridden by `--key-file` / `--vault-file`.
pub fn vault_config(cli: &Cli) -> Result<VaultConfig> {
    let cwd = std::env::current_dir()?;
    let mut settings = Settings::load(&cwd)?;

    if let Some(ref key_file) = cli.key_file {
        settings.key_file = key_file.clone();
    }
    if let Some(ref vault_file) = cli.vault_file {
        settings.vault_file = vault_file.clone();
    }

    Ok(VaultConfig::from_settings(&settings, &cwd))
}

/// Open the vault described by the CLI arguments.
pub fn open_vault(cli: &Cli) -> Result<PasswordVault> {
    let config = vault_config(cli)?;
    PasswordVault::open(&config)
}

/// Read the password for `label`.
///
/// Order: inline argument, piped stdin, interactive hidden prompt.
/// An empty result means "generate one".
pub fn read_password(label: &str, inline: Option<&str>) -> Result<Zeroizing<String>> {
    if let Some(p) = inline {
        output::warning("Password provided on command line — it may appear in shell history.");
        return Ok(Zeroizing::new(p.to_string()));
    }

    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end_matches(['\r', '\n']).to_string();
        return Ok(Zeroizing::new(trimmed));
    }

    prompt_password(label)
}

/// Hidden prompt that accepts an empty answer.
pub fn prompt_password(label: &str) -> Result<Zeroizing<String>> {
    let pw = dialoguer::Password::new()
        .with_prompt(format!(
            "Enter password for {label} (or leave blank to generate)"
        ))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}
