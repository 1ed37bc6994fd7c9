use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use focusdeck::cli::args::{Cli, Commands};
use focusdeck::cli::commands;
use focusdeck::config::{Config, Paths};
use focusdeck::features::focus::FocusStorage;
use focusdeck::logging::{self, LogTarget};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = match Config::load() {
        Ok(config) => config,
        // A broken settings file must not block `config reset`.
        Err(_) if matches!(cli.command, Commands::Config(_)) => Config::default(),
        Err(e) => return Err(e.into()),
    };
    config.general.color.apply();
    let format = cli.output.unwrap_or(config.general.default_output);

    if matches!(cli.command, Commands::Tui) {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        logging::init(cli.verbose, LogTarget::File(&paths.log_file))?;
    } else {
        logging::init(cli.verbose, LogTarget::Stderr)?;
    }

    let output = match cli.command {
        Commands::Run(args) => commands::run(&config, &args, format)?,
        Commands::Tui => {
            focusdeck::tui::run(&config, FocusStorage::new()?)?;
            String::new()
        }
        Commands::Status => commands::status(&config, format)?,
        Commands::History { limit } => commands::history(limit, format)?,
        Commands::Report { period } => commands::report(&period, format)?,
        Commands::Clear { force } => commands::clear(force, format)?,
        Commands::Config(args) => commands::config(args.command, format)?,
        Commands::Completions { shell, install } => commands::completions(&shell, install)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
