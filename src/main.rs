use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use ocrtrans::app::{list_languages, run_capture};
use ocrtrans::cli::{Cli, Commands, ConfigAction};
use ocrtrans::config::Config;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);
    log::debug!("ocrtrans {}", ocrtrans::version_string());

    let config_path = cli.config.clone();
    let quiet = cli.quiet;

    match cli.into_command() {
        Commands::Run(args) => {
            let config = load_config(config_path.as_deref())?;
            if let Err(e) = run_capture(config, &args, quiet) {
                report_error(&e);
                std::process::exit(1);
            }
        }
        Commands::Languages => {
            let config = load_config(config_path.as_deref())?;
            list_languages(&config)?;
        }
        Commands::Config { action } => {
            handle_config_command(action, config_path.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "ocrtrans", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Install env_logger. `RUST_LOG` wins over the command-line verbosity.
fn init_logging(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn report_error(error: &dyn std::fmt::Display) {
    if std::io::stderr().is_terminal() {
        eprintln!("{} {}", "Error:".red().bold(), error);
    } else {
        eprintln!("Error: {}", error);
    }
}

fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // Load from custom path
        Config::load(path)?
    } else {
        // Try default path, fall back to defaults
        Config::load_or_default(&Config::default_path())?
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}

fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    let config_path = custom_path
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path);

    match action {
        ConfigAction::Show => {
            let config = load_config(custom_path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
        ConfigAction::Init { force } => {
            if config_path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                );
            }
            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(&config_path, Config::default().to_toml()?)
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            println!("{} {}", "Wrote".green(), config_path.display());
        }
    }

    Ok(())
}
