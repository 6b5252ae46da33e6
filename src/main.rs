//! Pomodoro Timer CLI - work sessions and breaks in the terminal
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work
//! - 5 minutes of short break
//! - 15 minutes of long break after every 4 work sessions

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use pomodoro::cli::{self, Cli, Commands, Display, RunArgs};
use pomodoro::engine::TimerEngine;
use pomodoro::notification::{self, NotificationSink, SilentNotificationSink};
use pomodoro::sound;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so stdout carries only timer output.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Run(args)) => run(args).await?,
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Builds the engine from the run flags and hands it to the interactive loop.
async fn run(args: RunArgs) -> Result<()> {
    let config = args.config();
    config
        .validate()
        .with_context(|| format!("Configuración no válida: {:?}", config))?;

    let alert = sound::try_create_sink(args.no_sound);
    let notifier: Arc<dyn NotificationSink> = if args.no_notify {
        Arc::new(SilentNotificationSink)
    } else {
        notification::default_sink()
    };

    let engine = TimerEngine::builder()
        .config(config)
        .alert_sink(alert)
        .notification_sink(notifier)
        .build();

    engine.request_notification_permission();
    if args.start {
        engine.start();
    }

    cli::run(&engine, args.json).await
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================
