//! Core data types for the 25+5 clock.
//!
//! This module defines the data structures used for:
//! - Session/break phase and run state tracking
//! - Bounded length settings
//! - Read-only snapshots consumed by the presentation layer
//! - Runtime configuration with validation

use std::path::PathBuf;

use serde::Serialize;

use crate::sound::{SoundError, SoundSource};

// ============================================================================
// Constants
// ============================================================================

/// Default break length in minutes.
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// Default session length in minutes.
pub const DEFAULT_SESSION_MINUTES: u32 = 25;

/// Shortest length accepted by the adjusters.
pub const MIN_LENGTH_MINUTES: u32 = 1;

/// Longest length accepted by the adjusters.
pub const MAX_LENGTH_MINUTES: u32 = 60;

// ============================================================================
// TimerPhase
// ============================================================================

/// The phase the countdown is currently measuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Focused-work countdown
    #[default]
    Session,
    /// Rest countdown
    Break,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Session => "session",
            TimerPhase::Break => "break",
        }
    }

    /// Returns the label shown above the remaining time.
    pub fn label(&self) -> &'static str {
        match self {
            TimerPhase::Session => "Session",
            TimerPhase::Break => "Break",
        }
    }

    /// Returns the phase that follows this one at a boundary crossing.
    pub fn next(&self) -> Self {
        match self {
            TimerPhase::Session => TimerPhase::Break,
            TimerPhase::Break => TimerPhase::Session,
        }
    }
}

// ============================================================================
// RunState
// ============================================================================

/// Lifecycle state of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Fresh or just reset; lengths may still reload the countdown
    #[default]
    Initial,
    /// Counting down
    Running,
    /// Frozen at the last remaining value
    Paused,
    /// Reserved. No transition enters this state; reset leaves it.
    Error,
}

impl RunState {
    /// Returns the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Initial => "initial",
            RunState::Running => "running",
            RunState::Paused => "paused",
            RunState::Error => "error",
        }
    }

    /// Returns true if the countdown should be receiving ticks.
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running)
    }
}

// ============================================================================
// TimerStatus
// ============================================================================

/// Run state and phase, mutated together by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerStatus {
    /// Current run state
    pub state: RunState,
    /// Current phase
    pub mode: TimerPhase,
}

// ============================================================================
// LengthSetting
// ============================================================================

/// A length in minutes that always stays within
/// [`MIN_LENGTH_MINUTES`]..=[`MAX_LENGTH_MINUTES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthSetting(u32);

impl LengthSetting {
    /// Creates a setting, returning `None` when `minutes` is out of range.
    pub fn new(minutes: u32) -> Option<Self> {
        (MIN_LENGTH_MINUTES..=MAX_LENGTH_MINUTES)
            .contains(&minutes)
            .then_some(Self(minutes))
    }

    /// Default break length.
    pub fn default_break() -> Self {
        Self(DEFAULT_BREAK_MINUTES)
    }

    /// Default session length.
    pub fn default_session() -> Self {
        Self(DEFAULT_SESSION_MINUTES)
    }

    /// Returns the length in minutes.
    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// Returns the length in seconds.
    pub fn seconds(&self) -> i64 {
        i64::from(self.0) * 60
    }

    /// Applies `delta`, returning `None` if the result leaves the range.
    pub fn adjusted(&self, delta: i32) -> Option<Self> {
        let candidate = i64::from(self.0) + i64::from(delta);
        u32::try_from(candidate).ok().and_then(Self::new)
    }
}

// ============================================================================
// Intent
// ============================================================================

/// A user request forwarded from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Lengthen the break by one minute
    BreakIncrement,
    /// Shorten the break by one minute
    BreakDecrement,
    /// Lengthen the session by one minute
    SessionIncrement,
    /// Shorten the session by one minute
    SessionDecrement,
    /// Start, pause or resume
    StartPause,
    /// Return everything to defaults
    Reset,
}

// ============================================================================
// Time formatting
// ============================================================================

/// Formats remaining seconds as `MM:SS`, each part zero-padded to width 2.
///
/// Minutes are not capped, so 60 minutes renders as `60:00`. Negative input
/// never reaches the display; it is clamped to zero here.
pub fn format_time_remaining(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

// ============================================================================
// Snapshot
// ============================================================================

/// Read-only view of the clock handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Current run state
    pub state: RunState,
    /// Current phase
    pub mode: TimerPhase,
    /// Break length in minutes
    #[serde(rename = "breakLength")]
    pub break_length: u32,
    /// Session length in minutes
    #[serde(rename = "sessionLength")]
    pub session_length: u32,
    /// Remaining seconds in the current phase
    #[serde(rename = "timeRemaining")]
    pub time_remaining: i64,
    /// Remaining time formatted as `MM:SS`
    pub display: String,
}

// ============================================================================
// ClockConfig
// ============================================================================

/// How the presentation layer writes to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// A single status line redrawn in place
    #[default]
    Text,
    /// One JSON object per snapshot or event
    Json,
}

/// Runtime configuration for the clock front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockConfig {
    /// Whether the alert makes any sound
    pub sound_enabled: bool,
    /// Audio file used for the alert; the built-in beep when unset
    pub sound_path: Option<PathBuf>,
    /// Output format
    pub output: OutputFormat,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            sound_path: None,
            output: OutputFormat::Text,
        }
    }
}

impl ClockConfig {
    /// Uses the audio file at `path` for the alert.
    pub fn with_sound_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sound_path = Some(path.into());
        self
    }

    /// Silences the alert.
    pub fn without_sound(mut self) -> Self {
        self.sound_enabled = false;
        self
    }

    /// Sets the output format.
    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    /// Resolves the alert sound source, checking any configured file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured file is missing or unsupported.
    pub fn sound_source(&self) -> Result<SoundSource, SoundError> {
        match &self.sound_path {
            Some(path) => SoundSource::file_validated(path.clone()),
            None => Ok(SoundSource::beep()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
