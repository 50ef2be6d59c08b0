use clap::Parser;
use passvault::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Add {
            ref label,
            ref password,
            length,
        }) => passvault::cli::commands::add::execute(&cli, label, password.as_deref(), length),
        Some(Commands::Get { ref label }) => passvault::cli::commands::get::execute(&cli, label),
        Some(Commands::Autofill { ref label, copy }) => {
            passvault::cli::commands::autofill::execute(&cli, label, copy)
        }
        Some(Commands::Generate {
            length,
            ref classes,
        }) => passvault::cli::commands::generate::execute(&cli, length, classes),
        Some(Commands::Delete { ref label, force }) => {
            passvault::cli::commands::delete::execute(&cli, label, force)
        }
        Some(Commands::List) => passvault::cli::commands::list::execute(&cli),
        Some(Commands::Status) => passvault::cli::commands::status::execute(&cli),
        Some(Commands::Menu) | None => passvault::cli::commands::menu::execute(&cli),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, filtered by `PASSVAULT_LOG` (default: warn).
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("PASSVAULT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
