//! `passvault add` — store (or overwrite) a password.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{open_vault, read_password, Cli};
use crate::errors::Result;
use crate::service::PasswordVault;

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    label: &str,
    password: Option<&str>,
    length: Option<usize>,
) -> Result<()> {
    let input = read_password(label, password)?;
    let mut vault = open_vault(cli)?;
    store(&mut vault, label, &input, length)
}

/// Store `input` for `label`, generating a password when it is empty.
///
/// Shared with the interactive menu.
pub fn store(
    vault: &mut PasswordVault,
    label: &str,
    input: &str,
    length: Option<usize>,
) -> Result<()> {
    let existed = vault.contains(label);

    if input.is_empty() {
        let generated = Zeroizing::new(vault.add_generated(label, length)?);
        println!("Generated password: {}", generated.as_str());
    } else {
        vault.add(label, Some(input))?;
    }

    if existed {
        output::success(&format!("Password for {label} updated."));
    } else {
        output::success(&format!("Password for {label} saved."));
    }
    Ok(())
}
