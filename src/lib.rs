//! 25+5 Clock Library
//!
//! This library provides the core functionality for the 25+5 clock CLI.
//! It includes:
//! - The session/break controller and its one-second interval
//! - The event loop that feeds ticks and intents to the controller
//! - Sound playback for the alert cue
//! - CLI command parsing, stdin input and display utilities
//! - Type definitions for state, lengths and configuration

pub mod cli;
pub mod clock;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    format_time_remaining, ClockConfig, Intent, LengthSetting, OutputFormat, RunState, Snapshot,
    TimerPhase, TimerStatus,
};

pub use clock::{
    ClockError, ClockEvent, ClockInput, ManualScheduler, Renderer, TickScheduler, TimerController,
    TokioScheduler,
};

pub use sound::{
    default_player, MockSoundPlayer, RodioSoundPlayer, Silent, SoundError, SoundPlayer,
    SoundSource, TerminalBell,
};
