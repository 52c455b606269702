//! Luna CLI - Ask the fortune teller from the terminal.

use clap::Parser;
use luna_cli::commands;
use luna_cli::repl;
use luna_cli::{Cli, Command, Config, Formatter};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run() -> luna_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config_path = match &cli.config {
        Some(path) => PathBuf::from(path),
        None => Config::default_path()?,
    };

    // Profile commands edit the file, so a broken one is an error for them.
    // Everything else can run on the defaults.
    let mut config = match &cli.command {
        Some(Command::Profile(_)) => Config::load_from(&config_path)?,
        _ => Config::load_or_fallback(&config_path),
    };

    // Override profile if specified
    if let Some(profile_name) = cli.profile {
        config.switch_profile(profile_name)?;
    }

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&mut config, &formatter)?;
        }
        Some(Command::Ask(args)) => {
            let profile = config.get_active_profile()?;
            commands::execute_ask(args, profile, &formatter)?;
        }
        Some(Command::Profile(args)) => {
            commands::execute_profile(args, &mut config, &formatter)?;
        }
    }

    Ok(())
}
