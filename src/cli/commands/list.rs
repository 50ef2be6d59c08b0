//! `passvault list` — show stored labels (no decryption).

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let vault = open_vault(cli)?;
    output::print_records_table(&vault.list());
    Ok(())
}
