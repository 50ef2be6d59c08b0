//! `passvault status` — key fingerprint, file locations, record count.

use console::style;

use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let status = open_vault(cli)?.status();

    println!("{} {}", style("Key file:   ").bold(), status.key_path.display());
    println!("{} {}", style("Fingerprint:").bold(), status.key_fingerprint);
    println!("{} {}", style("Vault file: ").bold(), status.vault_path.display());
    println!("{} {}", style("Passwords:  ").bold(), status.record_count);

    Ok(())
}
