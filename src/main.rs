//! 25+5 Clock CLI
//!
//! A session/break countdown in the terminal:
//! - 25 minutes of session
//! - 5 minutes of break
//! - lengths adjustable from 1 to 60 minutes

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;

use pomodoro_clock::cli::{show_error, spawn_command_reader, Cli, Commands, Display};
use pomodoro_clock::clock::{self, TimerController, TokioScheduler};
use pomodoro_clock::sound::default_player;
use pomodoro_clock::types::ClockConfig;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = execute(cli).await {
        show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
///
/// Logs go to stderr so they never interleave with the clock line on stdout.
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

    match cli.command.unwrap_or_default() {
        Commands::Run(args) => run_clock(args.to_config()).await,
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    }
}

/// Wires the controller to stdin, Ctrl-C, the speaker and stdout, then runs
/// until the user quits.
async fn run_clock(config: ClockConfig) -> Result<()> {
    let sound = config
        .sound_source()
        .context("Invalid --sound argument")?;
    let player = default_player(!config.sound_enabled);

    let (input_tx, input_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let controller = TimerController::new(
        TokioScheduler::new(input_tx.clone()),
        player,
        sound,
        event_tx,
    );

    spawn_command_reader(std::io::BufReader::new(std::io::stdin()), input_tx.clone());
    clock::spawn_interrupt_listener(input_tx);

    let mut display = Display::new(std::io::stdout(), config.output);
    clock::run(controller, input_rx, event_rx, &mut display)
        .await
        .context("Clock stopped unexpectedly")?;
    display.finish().context("Failed to write output")?;

    Ok(())
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
