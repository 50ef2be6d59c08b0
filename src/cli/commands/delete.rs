//! `passvault delete` — remove a stored password.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, label: &str, force: bool) -> Result<()> {
    let mut vault = open_vault(cli)?;

    if !vault.contains(label) {
        return Err(VaultError::LabelNotFound(label.to_string()));
    }

    if !force {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!("Delete the password for '{label}'?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    // Another process may have removed it since we opened the vault.
    if vault.delete(label)? {
        output::success(&format!("Password for {label} deleted."));
    } else {
        output::warning(&format!("Password for {label} was already gone."));
    }

    Ok(())
}
