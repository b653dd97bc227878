//! Command definitions for the 25+5 clock CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::{ClockConfig, OutputFormat};

// ============================================================================
// CLI Structure
// ============================================================================

/// 25+5 Clock - session/break countdown in the terminal
#[derive(Parser, Debug)]
#[command(
    name = "pomodoro-clock",
    version,
    about = "A 25+5 session/break countdown clock",
    long_about = "A 25-minute session / 5-minute break countdown clock.\n\
                  Type a command and press Enter: <Enter> or t to start/pause, r to reset,\n\
                  b+ / b- to change the break length, s+ / s- to change the session length,\n\
                  q to quit.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the interactive clock
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run(RunArgs::default())
    }
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Disable the alert sound
    #[arg(long)]
    pub no_sound: bool,

    /// Audio file to play when the countdown reaches zero
    #[arg(long, value_name = "PATH", conflicts_with = "no_sound")]
    pub sound: Option<PathBuf>,

    /// Print snapshots and events as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Builds the runtime configuration.
    pub fn to_config(&self) -> ClockConfig {
        let mut config = ClockConfig::default();
        if self.no_sound {
            config = config.without_sound();
        }
        if let Some(path) = &self.sound {
            config = config.with_sound_path(path.clone());
        }
        if self.json {
            config = config.with_output(OutputFormat::Json);
        }
        config
    }
}

// ============================================================================
// Tests
// ============================================================================
