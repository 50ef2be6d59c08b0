//! `passvault autofill` — present a stored password at the point of use.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{Result, VaultError};

/// Execute the `autofill` command.
pub fn execute(cli: &Cli, label: &str, copy: bool) -> Result<()> {
    let vault = open_vault(cli)?;

    let password = vault
        .autofill(label)?
        .map(Zeroizing::new)
        .ok_or_else(|| VaultError::LabelNotFound(label.to_string()))?;

    if copy {
        copy_to_clipboard(&password)?;
        output::success(&format!("Password for {label} copied to clipboard."));
    } else {
        println!("Autofill for {label}: {}", password.as_str());
    }

    Ok(())
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| VaultError::CommandFailed(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(text)
        .map_err(|e| VaultError::CommandFailed(format!("clipboard write failed: {e}")))
}
