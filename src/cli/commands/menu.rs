//! `passvault menu` — the interactive loop (also the default command).
//!
//! Errors from a single action are reported and the loop continues;
//! only a failure to open the vault or to read the menu choice ends it.

use dialoguer::{Input, Select};
use zeroize::Zeroizing;

use crate::cli::commands::add;
use crate::cli::output;
use crate::cli::{open_vault, prompt_password, Cli};
use crate::errors::{Result, VaultError};
use crate::service::PasswordVault;

const ITEMS: [&str; 5] = [
    "Add password",
    "Retrieve password",
    "Generate password",
    "Autofill",
    "Exit",
];

/// Execute the interactive menu.
pub fn execute(cli: &Cli) -> Result<()> {
    let mut vault = open_vault(cli)?;

    loop {
        println!();
        let choice = Select::new()
            .with_prompt("Select an option")
            .items(&ITEMS)
            .default(0)
            .interact_opt()
            .map_err(|e| VaultError::CommandFailed(format!("menu prompt: {e}")))?;

        let outcome = match choice {
            Some(0) => add_password(&mut vault),
            Some(1) => show_password(&vault, false),
            Some(2) => generate_password(&vault),
            Some(3) => show_password(&vault, true),
            _ => return Ok(()),
        };

        if let Err(e) = outcome {
            output::error(&e.to_string());
        }
    }
}

fn add_password(vault: &mut PasswordVault) -> Result<()> {
    let label = ask_label()?;
    let input = prompt_password(&label)?;
    add::store(vault, &label, &input, None)
}

fn show_password(vault: &PasswordVault, autofill: bool) -> Result<()> {
    let label = ask_label()?;
    let found = if autofill {
        vault.autofill(&label)?
    } else {
        vault.retrieve(&label)?
    };

    match found.map(Zeroizing::new) {
        Some(password) if autofill => println!("Autofill for {label}: {}", password.as_str()),
        Some(password) => println!("Password: {}", password.as_str()),
        None => output::warning(&format!("No password stored for '{label}'.")),
    }
    Ok(())
}

fn generate_password(vault: &PasswordVault) -> Result<()> {
    let length: usize = Input::new()
        .with_prompt("Enter password length")
        .default(vault.password_length())
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("length prompt: {e}")))?;

    let password = Zeroizing::new(vault.generate(Some(length))?);
    println!("Generated password: {}", password.as_str());
    Ok(())
}

fn ask_label() -> Result<String> {
    Input::<String>::new()
        .with_prompt("Enter website")
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))
}
