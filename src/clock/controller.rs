//! Session/break controller for the 25+5 clock.
//!
//! This module owns the whole clock state:
//! - Bounded break/session lengths
//! - Run state transitions (Initial → Running ⇄ Paused → Initial)
//! - The countdown and its boundary crossing into the other phase
//! - The single live tick interval
//! - The alert cue at zero

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::sound::{SoundPlayer, SoundSource};
use crate::types::{
    format_time_remaining, Intent, LengthSetting, RunState, Snapshot, TimerPhase, TimerStatus,
};

use super::error::ClockError;
use super::ticker::TickScheduler;

// ============================================================================
// ClockEvent
// ============================================================================

/// Notifications emitted by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClockEvent {
    /// Countdown started from the initial state
    Started,
    /// Countdown paused
    Paused,
    /// Countdown resumed after a pause
    Resumed,
    /// Everything returned to defaults
    Reset,
    /// One second elapsed
    Tick {
        /// Remaining seconds after the decrement
        #[serde(rename = "remainingSeconds")]
        remaining_seconds: i64,
    },
    /// The countdown crossed zero and switched phase
    PhaseChanged {
        /// The phase now running
        mode: TimerPhase,
        /// Seconds loaded for the new phase
        #[serde(rename = "remainingSeconds")]
        remaining_seconds: i64,
    },
    /// The countdown reached zero and the alert was triggered
    AlertFired {
        /// The phase that just finished
        mode: TimerPhase,
    },
    /// Break length accepted a new value
    BreakLengthChanged {
        /// New length in minutes
        minutes: u32,
    },
    /// Session length accepted a new value
    SessionLengthChanged {
        /// New length in minutes
        minutes: u32,
    },
}

impl ClockEvent {
    fn name(&self) -> &'static str {
        match self {
            ClockEvent::Started => "started",
            ClockEvent::Paused => "paused",
            ClockEvent::Resumed => "resumed",
            ClockEvent::Reset => "reset",
            ClockEvent::Tick { .. } => "tick",
            ClockEvent::PhaseChanged { .. } => "phase changed",
            ClockEvent::AlertFired { .. } => "alert fired",
            ClockEvent::BreakLengthChanged { .. } => "break length changed",
            ClockEvent::SessionLengthChanged { .. } => "session length changed",
        }
    }
}

// ============================================================================
// TimerController
// ============================================================================

/// Owns the clock state. Every user intent is a method.
pub struct TimerController<S: TickScheduler> {
    /// Run state and phase
    status: TimerStatus,
    /// Break length
    break_length: LengthSetting,
    /// Session length
    session_length: LengthSetting,
    /// Remaining seconds. Dips to -1 only inside `tick` before `settle`.
    time_remaining: i64,
    /// Source of tick intervals
    scheduler: S,
    /// The live interval, if any
    interval: Option<S::Handle>,
    /// Generation of the most recently acquired interval
    generation: u64,
    /// Alert output
    player: Arc<dyn SoundPlayer>,
    /// Alert cue
    sound: SoundSource,
    /// Event sender channel
    event_tx: mpsc::UnboundedSender<ClockEvent>,
}

impl<S: TickScheduler> TimerController<S> {
    /// Creates a controller in the initial state with default lengths.
    pub fn new(
        scheduler: S,
        player: Arc<dyn SoundPlayer>,
        sound: SoundSource,
        event_tx: mpsc::UnboundedSender<ClockEvent>,
    ) -> Self {
        let session_length = LengthSetting::default_session();
        Self {
            status: TimerStatus::default(),
            break_length: LengthSetting::default_break(),
            session_length,
            time_remaining: session_length.seconds(),
            scheduler,
            interval: None,
            generation: 0,
            player,
            sound,
            event_tx,
        }
    }

    // ------------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------------

    /// Dispatches a user intent to the matching operation.
    ///
    /// # Errors
    ///
    /// Returns an error if the event receiver has been dropped.
    pub fn apply(&mut self, intent: Intent) -> Result<(), ClockError> {
        debug!(?intent, "Applying intent");
        match intent {
            Intent::BreakIncrement => self.adjust_break(1),
            Intent::BreakDecrement => self.adjust_break(-1),
            Intent::SessionIncrement => self.adjust_session(1),
            Intent::SessionDecrement => self.adjust_session(-1),
            Intent::StartPause => self.toggle(),
            Intent::Reset => self.reset(),
        }
    }

    /// Changes the break length by `delta` minutes.
    ///
    /// A result outside 1..=60 is ignored and the previous value kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the event receiver has been dropped.
    pub fn adjust_break(&mut self, delta: i32) -> Result<(), ClockError> {
        let Some(length) = self.break_length.adjusted(delta) else {
            debug!(
                current = self.break_length.minutes(),
                delta, "Break length adjustment rejected"
            );
            return Ok(());
        };

        self.break_length = length;
        self.emit(ClockEvent::BreakLengthChanged {
            minutes: length.minutes(),
        })?;
        self.settle()
    }

    /// Changes the session length by `delta` minutes.
    ///
    /// A result outside 1..=60 is ignored and the previous value kept. While
    /// the clock is still initial the countdown is reloaded to the new
    /// length; a running or paused countdown is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the event receiver has been dropped.
    pub fn adjust_session(&mut self, delta: i32) -> Result<(), ClockError> {
        let Some(length) = self.session_length.adjusted(delta) else {
            debug!(
                current = self.session_length.minutes(),
                delta, "Session length adjustment rejected"
            );
            return Ok(());
        };

        self.session_length = length;
        if self.status.state == RunState::Initial {
            self.time_remaining = length.seconds();
        }
        self.emit(ClockEvent::SessionLengthChanged {
            minutes: length.minutes(),
        })?;
        self.settle()
    }

    /// Single start/pause control.
    ///
    /// Running pauses; every other state, the reserved Error state
    /// included, starts running.
    ///
    /// # Errors
    ///
    /// Returns an error if the event receiver has been dropped.
    pub fn toggle(&mut self) -> Result<(), ClockError> {
        let (next, event) = match self.status.state {
            RunState::Running => (RunState::Paused, ClockEvent::Paused),
            RunState::Paused => (RunState::Running, ClockEvent::Resumed),
            RunState::Initial | RunState::Error => (RunState::Running, ClockEvent::Started),
        };

        self.status.state = next;
        self.sync_interval();
        info!(
            state = next.as_str(),
            remaining = self.time_remaining,
            "Run state changed"
        );
        self.emit(event)?;
        self.settle()
    }

    /// Returns everything to defaults: Initial, Session, 5/25 minutes and a
    /// full session on the clock. Stops and rewinds the alert.
    ///
    /// # Errors
    ///
    /// Returns an error if the event receiver has been dropped.
    pub fn reset(&mut self) -> Result<(), ClockError> {
        self.status = TimerStatus::default();
        self.sync_interval();

        self.break_length = LengthSetting::default_break();
        self.session_length = LengthSetting::default_session();
        self.time_remaining = self.session_length.seconds();

        self.player.stop();

        info!("Clock reset");
        self.emit(ClockEvent::Reset)?;
        self.settle()
    }

    // ------------------------------------------------------------------------
    // Countdown
    // ------------------------------------------------------------------------

    /// Handles one tick from the interval tagged `generation`.
    ///
    /// Returns `false` when the tick was ignored: it came from a released
    /// interval or the clock is not running.
    ///
    /// # Errors
    ///
    /// Returns an error if the event receiver has been dropped.
    pub fn tick(&mut self, generation: u64) -> Result<bool, ClockError> {
        if !self.status.state.is_running() || self.interval_generation() != Some(generation) {
            debug!(generation, current = ?self.interval_generation(), "Stale tick ignored");
            return Ok(false);
        }

        let finished_mode = self.status.mode;
        self.time_remaining -= 1;
        self.settle()?;

        self.emit(ClockEvent::Tick {
            remaining_seconds: self.time_remaining,
        })?;

        if self.time_remaining == 0 {
            self.fire_alert(finished_mode)?;
        }

        Ok(true)
    }

    /// Switches phase when the countdown has gone below zero.
    ///
    /// Runs after every mutation, so no caller ever observes a negative
    /// remaining time.
    fn settle(&mut self) -> Result<(), ClockError> {
        if self.time_remaining >= 0 {
            return Ok(());
        }

        let mode = self.status.mode.next();
        self.status.mode = mode;
        self.time_remaining = self.length_for(mode).seconds();

        info!(
            mode = mode.as_str(),
            remaining = self.time_remaining,
            "Phase changed"
        );
        self.emit(ClockEvent::PhaseChanged {
            mode,
            remaining_seconds: self.time_remaining,
        })
    }

    fn fire_alert(&mut self, mode: TimerPhase) -> Result<(), ClockError> {
        info!(
            mode = mode.as_str(),
            sound = %self.sound.name(),
            "Countdown reached zero"
        );
        if let Err(e) = self.player.play(&self.sound) {
            warn!("Failed to play alert: {} ({})", e, e.suggestion());
        }
        self.emit(ClockEvent::AlertFired { mode })
    }

    /// Acquires or releases the interval to match the run state.
    ///
    /// A new interval is only acquired when none is held.
    fn sync_interval(&mut self) {
        if self.status.state.is_running() {
            if self.interval.is_none() {
                self.generation = self.generation.wrapping_add(1);
                self.interval = Some(self.scheduler.schedule(self.generation));
            }
        } else {
            self.interval = None;
        }
    }

    fn length_for(&self, mode: TimerPhase) -> LengthSetting {
        match mode {
            TimerPhase::Session => self.session_length,
            TimerPhase::Break => self.break_length,
        }
    }

    fn emit(&self, event: ClockEvent) -> Result<(), ClockError> {
        let name = event.name();
        self.event_tx
            .send(event)
            .map_err(|_| ClockError::EventChannelClosed(name))
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns the run state and phase.
    pub fn status(&self) -> TimerStatus {
        self.status
    }

    /// Returns the remaining seconds. Never negative.
    pub fn time_remaining(&self) -> i64 {
        self.time_remaining
    }

    /// Returns the break length in minutes.
    pub fn break_length(&self) -> u32 {
        self.break_length.minutes()
    }

    /// Returns the session length in minutes.
    pub fn session_length(&self) -> u32 {
        self.session_length.minutes()
    }

    /// Returns the remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        format_time_remaining(self.time_remaining)
    }

    /// Returns the generation of the live interval, if one is held.
    pub fn interval_generation(&self) -> Option<u64> {
        self.interval.as_ref().map(|_| self.generation)
    }

    /// Returns a read-only view for rendering.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            state: self.status.state,
            mode: self.status.mode,
            break_length: self.break_length(),
            session_length: self.session_length(),
            time_remaining: self.time_remaining,
            display: self.display(),
        }
    }

    /// Forces a run state (for testing the reserved error state).
    #[cfg(test)]
    pub(crate) fn set_state_for_test(&mut self, state: RunState) {
        self.status.state = state;
        self.sync_interval();
    }

    /// Overrides the remaining time (for testing boundaries).
    #[cfg(test)]
    pub(crate) fn set_time_remaining_for_test(&mut self, seconds: i64) {
        self.time_remaining = seconds;
    }
}

// ============================================================================
// Tests
// ============================================================================
