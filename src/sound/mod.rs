//! Sound playback for the clock's alert cue.
//!
//! This module provides:
//!
//! - The [`SoundPlayer`] trait the alert trigger talks to
//! - A rodio-backed player with a built-in beep
//! - A terminal bell for machines without an audio device
//! - A silent player for `--no-sound` and a mock for tests
//!
//! # Usage
//!
//! ```rust,no_run
//! use pomodoro_clock::sound::{default_player, SoundSource};
//!
//! let player = default_player(false);
//! player.play(&SoundSource::beep()).expect("playback failed");
//! player.stop();
//! ```

mod embedded;
mod error;
mod player;
mod source;

use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

pub use embedded::{beep_source, BEEP_DURATION, BEEP_FREQUENCY_HZ, BEEP_VOLUME};
pub use error::SoundError;
pub use player::RodioSoundPlayer;
pub use source::SoundSource;

/// Output for the alert cue.
pub trait SoundPlayer {
    /// Starts `source` from its first sample. Returns without waiting for
    /// playback to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if playback cannot start.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;

    /// Cuts off the current playback, if any.
    fn stop(&self);
}

// ============================================================================
// Fallback players
// ============================================================================

/// Rings the terminal bell on stderr. Used when no audio device exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl SoundPlayer for TerminalBell {
    fn play(&self, _source: &SoundSource) -> Result<(), SoundError> {
        let mut stderr = std::io::stderr();
        stderr
            .write_all(b"\x07")
            .and_then(|()| stderr.flush())
            .map_err(|e| SoundError::PlaybackError(e.to_string()))
    }

    // A bell cannot be interrupted.
    fn stop(&self) {}
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SoundPlayer for Silent {
    fn play(&self, _source: &SoundSource) -> Result<(), SoundError> {
        Ok(())
    }

    fn stop(&self) {}
}

/// Picks the alert output: nothing when `muted`, rodio when an output device
/// exists, otherwise the terminal bell.
#[must_use]
pub fn default_player(muted: bool) -> Arc<dyn SoundPlayer> {
    if muted {
        debug!("Alert sound disabled");
        return Arc::new(Silent);
    }

    match RodioSoundPlayer::open() {
        Ok(player) => Arc::new(player) as Arc<dyn SoundPlayer>,
        Err(e) => {
            warn!("{}; falling back to the terminal bell ({})", e, e.suggestion());
            Arc::new(TerminalBell)
        }
    }
}

// ============================================================================
// MockSoundPlayer
// ============================================================================

/// Records calls instead of making sound.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    plays: Mutex<Vec<SoundSource>>,
    stops: AtomicUsize,
    playing: AtomicBool,
    fail: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later `play` return an error.
    pub fn set_should_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.plays.lock().unwrap().len()
    }

    #[must_use]
    pub fn stop_count(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    /// True between a successful `play` and the next `stop`.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    /// Sources passed to `play`, oldest first.
    #[must_use]
    pub fn played(&self) -> Vec<SoundSource> {
        self.plays.lock().unwrap().clone()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("mock failure".to_string()));
        }
        self.plays.lock().unwrap().push(source.clone());
        self.playing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.playing.store(false, Ordering::SeqCst);
    }
}
