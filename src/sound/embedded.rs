//! Built-in alert beep.
//!
//! Synthesized at playback time so the binary carries no audio asset.

use std::time::Duration;

use rodio::source::{SineWave, Source};

/// Pitch of the beep.
pub const BEEP_FREQUENCY_HZ: f32 = 880.0;

/// Length of one beep.
pub const BEEP_DURATION: Duration = Duration::from_millis(600);

/// Output gain applied to the sine wave.
pub const BEEP_VOLUME: f32 = 0.25;

/// Returns the beep as a finite rodio source.
#[must_use]
pub fn beep_source() -> impl Source<Item = f32> + Send + 'static {
    SineWave::new(BEEP_FREQUENCY_HZ)
        .take_duration(BEEP_DURATION)
        .amplify(BEEP_VOLUME)
}
