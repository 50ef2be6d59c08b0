//! `passvault get` — retrieve and print a single password.

use crate::cli::{open_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `get` command.
pub fn execute(cli: &Cli, label: &str) -> Result<()> {
    let vault = open_vault(cli)?;

    let password = vault
        .retrieve(label)?
        .map(zeroize::Zeroizing::new)
        .ok_or_else(|| VaultError::LabelNotFound(label.to_string()))?;
    println!("{}", password.as_str());

    Ok(())
}
