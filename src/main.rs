//! tmux-warden - interactive tmux session manager
//!
//! Run with `tmux-warden` or `tmux-warden --help` for usage.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use tmux_warden::{
    APP_NAME, VERSION,
    config::Config,
    menu::{Menu, Theme},
    projects::FzfPicker,
    report::Report,
    tmux::{Collector, CommandRunner, TmuxExecutor},
};

#[derive(Parser)]
#[command(name = APP_NAME)]
#[command(version = VERSION)]
#[command(about = "Inspect tmux sessions and close the unused ones safely")]
#[command(long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (default)
    Menu,

    /// Print all sessions and exit
    List {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show configuration
    Config {
        /// Initialize config file with defaults
        #[arg(long)]
        init: bool,
    },
}

fn setup_logging(debug: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info").add_directive("tokio=warn".parse()?)
    };

    if let Some(path) = log_file {
        // Log to file when running the menu so logs don't interfere with it
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;

        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(file).with_target(false))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .with(filter)
            .init();
    }

    Ok(())
}

fn build_runner(config: &Config) -> Arc<dyn CommandRunner> {
    Arc::new(
        TmuxExecutor::with_binary(config.tmux_binary.clone())
            .with_timeout(config.command_timeout()),
    )
}

/// Warn up front when the tmux binary cannot be run
async fn warn_if_tmux_missing(config: &Config) {
    let executor = TmuxExecutor::with_binary(config.tmux_binary.clone());
    if let Err(e) = executor.check_installed().await {
        warn!("{}", e);
        eprintln!(
            "Warning: '{}' could not be run, no sessions will be listed: {}",
            config.tmux_binary, e
        );
    }
}

fn inside_tmux() -> bool {
    std::env::var("TMUX").is_ok_and(|v| !v.is_empty())
}

async fn run_menu(config: Config) -> Result<()> {
    let theme = Theme::default();

    if !inside_tmux() {
        println!(
            "{}",
            theme.paint("Note: You're not currently in a tmux session.", theme.warning)
        );
        println!("Some features may be limited.\n");
    }

    let picker = FzfPicker::new(config.picker_program.clone())
        .with_prompt(config.picker_prompt.clone())
        .with_height(config.picker_height.clone());
    let runner = build_runner(&config);
    let input = tokio::io::BufReader::new(tokio::io::stdin());

    let mut menu = Menu::new(config, runner, Arc::new(picker), input, std::io::stdout())
        .with_theme(theme.clone());

    tokio::select! {
        result = menu.run() => {
            result?;
            info!("Menu exited");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted");
            println!(
                "\n\n{}",
                theme.paint("Interrupted. Your tmux sessions remain active.", theme.success)
            );
            // A pending stdin read would otherwise keep the runtime alive
            std::process::exit(0);
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Install color-eyre error hooks
    color_eyre::install()?;

    let cli = Cli::parse();

    // Load configuration
    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: Failed to load config, using defaults: {}", e);
            Config::default()
        }),
    };
    let debug = cli.debug || config.debug;

    match cli.command {
        None | Some(Commands::Menu) => {
            if let Err(e) = config.ensure_directories() {
                eprintln!("Warning: Failed to create directories: {}", e);
            }
            let log_file = config.log_file_path()?;
            setup_logging(debug, Some(log_file.as_path()))?;

            info!("Starting tmux-warden v{}", VERSION);
            warn_if_tmux_missing(&config).await;
            run_menu(config).await?;
        }

        Some(Commands::List { json }) => {
            setup_logging(debug, None)?;
            warn_if_tmux_missing(&config).await;

            let collector = Collector::new(build_runner(&config));
            let report = Report::collect(&collector, config.protected_sessions.as_slice()).await;
            if report.sessions.is_empty() {
                warn!("No sessions found (is the tmux server running?)");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report.to_text());
            }
        }

        Some(Commands::Config { init }) => {
            setup_logging(debug, None)?;

            if init {
                let path = match cli.config.as_deref() {
                    Some(path) => {
                        config.save_to(path)?;
                        path.to_path_buf()
                    }
                    None => config.save()?,
                };
                println!("Configuration initialized at {:?}", path);
            } else {
                println!("Configuration:");
                println!("{}", toml::to_string_pretty(&config)?);
                println!("\nConfig file: {:?}", Config::config_file_path()?);
                println!("Roots file: {:?}", config.roots_file_path()?);
                println!("Log file: {:?}", config.log_file_path()?);
            }
        }
    }

    Ok(())
}
