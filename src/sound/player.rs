//! Alert playback through rodio.
//!
//! Every alert gets its own `Sink`. Stopping drops it, so the next alert
//! always starts from the first sample.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, warn};

use super::embedded::beep_source;
use super::error::SoundError;
use super::source::SoundSource;
use super::SoundPlayer;

/// Plays alerts on the default output device.
pub struct RodioSoundPlayer {
    /// Dropping the stream silences every sink.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    /// The alert currently sounding, if any.
    active: Mutex<Option<Sink>>,
}

impl RodioSoundPlayer {
    /// Opens the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` when the host has no output
    /// device.
    pub fn open() -> Result<Self, SoundError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Opened audio output");

        Ok(Self {
            _stream: stream,
            handle,
            active: Mutex::new(None),
        })
    }

    fn start<S>(&self, source: S) -> Result<(), SoundError>
    where
        S: Source<Item = f32> + Send + 'static,
    {
        let sink =
            Sink::try_new(&self.handle).map_err(|e| SoundError::StreamError(e.to_string()))?;
        sink.append(source);

        // The previous sink, if any, stops when dropped here.
        *self.active() = Some(sink);
        Ok(())
    }

    fn start_file(&self, path: &Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
        let decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| SoundError::DecodeError(e.to_string()))?;

        self.start(decoder.convert_samples::<f32>())
    }

    fn active(&self) -> MutexGuard<'_, Option<Sink>> {
        self.active
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        let SoundSource::File { path } = source else {
            debug!("Playing built-in beep");
            return self.start(beep_source());
        };

        debug!(path = %path.display(), "Playing alert file");
        match self.start_file(path) {
            Err(e) if e.is_file_error() => {
                warn!("Cannot play '{}' ({}), using the beep", path.display(), e);
                self.start(beep_source())
            }
            result => result,
        }
    }

    fn stop(&self) {
        if let Some(sink) = self.active().take() {
            sink.stop();
            debug!("Alert stopped");
        }
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("playing", &self.active().is_some())
            .finish_non_exhaustive()
    }
}
