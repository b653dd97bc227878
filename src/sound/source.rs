//! Sound source selection.
//!
//! The alert cue is either a user-supplied audio file or the built-in
//! synthesized beep.

use std::path::{Path, PathBuf};

use super::error::SoundError;

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["aiff", "wav", "mp3", "flac", "ogg"];

/// Represents the source of the alert sound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// An audio file on disk.
    File {
        /// The full path to the sound file.
        path: PathBuf,
    },
    /// The beep compiled into the binary.
    Beep,
}

impl SoundSource {
    /// Creates a file sound source without touching the filesystem.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Creates a file sound source, checking that the file exists and has a
    /// supported extension.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::FileNotFound` or `SoundError::UnsupportedFormat`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pomodoro_clock::sound::SoundSource;
    ///
    /// let source = SoundSource::file_validated("/nonexistent/beep.mp3");
    /// assert!(source.is_err());
    /// ```
    pub fn file_validated(path: impl Into<PathBuf>) -> Result<Self, SoundError> {
        let path = path.into();
        validate_sound_path(&path)?;
        Ok(Self::File { path })
    }

    /// Returns the built-in beep source.
    #[must_use]
    pub fn beep() -> Self {
        Self::Beep
    }

    /// Returns a short human-readable name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::File { path } => path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Beep => "beep".to_string(),
        }
    }

    /// Returns true if this is the built-in beep.
    #[must_use]
    pub fn is_beep(&self) -> bool {
        matches!(self, Self::Beep)
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path } => Some(path),
            Self::Beep => None,
        }
    }
}

impl Default for SoundSource {
    fn default() -> Self {
        Self::Beep
    }
}

fn validate_sound_path(path: &Path) -> Result<(), SoundError> {
    if !path.is_file() {
        return Err(SoundError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(())
    } else {
        Err(SoundError::UnsupportedFormat(path.display().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_source() {
        let source = SoundSource::file("/sounds/beep-alarm.mp3");
        assert!(!source.is_beep());
        assert_eq!(source.name(), "beep-alarm");
        assert_eq!(source.path(), Some(Path::new("/sounds/beep-alarm.mp3")));
    }

    #[test]
    fn test_beep_is_default() {
        let source = SoundSource::default();
        assert!(source.is_beep());
        assert_eq!(source.name(), "beep");
        assert!(source.path().is_none());
    }

    #[test]
    fn test_validated_missing_file() {
        let result = SoundSource::file_validated("/nonexistent/path/alarm.wav");
        match result {
            Err(SoundError::FileNotFound(msg)) => assert!(msg.contains("alarm.wav")),
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_validated_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"not audio").unwrap();

        let result = SoundSource::file_validated(&path);
        assert!(matches!(result, Err(SoundError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_validated_accepts_supported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Alarm.WAV");
        std::fs::write(&path, b"RIFF").unwrap();

        let source = SoundSource::file_validated(&path).unwrap();
        assert_eq!(source.path(), Some(path.as_path()));
    }

    #[test]
    fn test_supported_extensions() {
        assert!(SUPPORTED_EXTENSIONS.contains(&"mp3"));
        assert!(SUPPORTED_EXTENSIONS.contains(&"wav"));
    }
}
