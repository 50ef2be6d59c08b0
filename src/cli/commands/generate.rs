//! `passvault generate` — print a random password without storing it.

use crate::cli::{vault_config, ClassArgs, Cli};
use crate::errors::Result;
use crate::generator::PasswordGenerator;

/// Execute the `generate` command.
///
/// Does not touch the key or vault files.
pub fn execute(cli: &Cli, length: Option<usize>, classes: &ClassArgs) -> Result<()> {
    let config = vault_config(cli)?;
    let generator = PasswordGenerator::new(classes.apply(config.classes))?;

    let password = zeroize::Zeroizing::new(
        generator.generate(length.unwrap_or(config.password_length))?,
    );
    println!("{}", password.as_str());

    Ok(())
}
