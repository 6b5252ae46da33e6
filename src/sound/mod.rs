//! Audio alert for session transitions.
//!
//! This module provides the audio side effect fired when a countdown
//! reaches zero:
//!
//! - Deterministic tone synthesis (`Tone`, `ToneSource`)
//! - Non-blocking playback through rodio on a dedicated audio thread
//! - Graceful degradation when audio is unavailable
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │      Timer       │
//! └────────┬─────────┘
//!          │ play(&Tone)
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │    AlertSink     │────▶│  RodioAlertSink  │──▶ audio thread
//! │     (trait)      │     ├──────────────────┤
//! │                  │────▶│ SilentAlertSink  │
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use pomodoro::sound::{try_create_sink, Tone};
//!
//! // Falls back to a silent sink when there is no audio device
//! let sink = try_create_sink(false);
//! let _ = sink.play(&Tone::session_end());
//! ```

mod error;
mod player;
mod tone;

use std::sync::Arc;

use tracing::warn;

pub use error::SoundError;
pub use player::RodioAlertSink;
pub use tone::{Tone, ToneSource, SAMPLE_RATE};

/// Capability to play the session-end alert.
///
/// Implementations must not block the caller for the length of the tone.
pub trait AlertSink: Send + Sync {
    /// Starts playing `tone`.
    ///
    /// # Errors
    ///
    /// Returns an error if playback could not be started.
    fn play(&self, tone: &Tone) -> Result<(), SoundError>;

    /// Returns true if the audio system is available.
    fn is_available(&self) -> bool;
}

impl AlertSink for RodioAlertSink {
    fn play(&self, tone: &Tone) -> Result<(), SoundError> {
        RodioAlertSink::play(self, tone)
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Alert sink used when sound is disabled or no backend exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlertSink;

impl AlertSink for SilentAlertSink {
    fn play(&self, _tone: &Tone) -> Result<(), SoundError> {
        Ok(())
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Mock alert sink for testing.
#[derive(Debug, Default)]
pub struct MockAlertSink {
    play_calls: std::sync::Mutex<Vec<Tone>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockAlertSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.play_calls.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<Tone> {
        self.play_calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.play_calls.lock().unwrap().clear();
    }
}

impl AlertSink for MockAlertSink {
    fn play(&self, tone: &Tone) -> Result<(), SoundError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SoundError::PlaybackError("Mock failure".to_string()));
        }
        self.play_calls.lock().unwrap().push(*tone);
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Creates the alert sink for the current machine.
///
/// Returns a silent sink when `disabled` is set or when audio cannot be
/// initialized; the latter is logged as a warning.
#[must_use]
pub fn try_create_sink(disabled: bool) -> Arc<dyn AlertSink> {
    if disabled {
        return Arc::new(SilentAlertSink);
    }

    match RodioAlertSink::new() {
        Ok(sink) => Arc::new(sink),
        Err(e) => {
            warn!("Audio not available, sound disabled: {}", e);
            Arc::new(SilentAlertSink)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_sink_accepts_everything() {
        let sink = SilentAlertSink;
        assert!(sink.play(&Tone::session_end()).is_ok());
        assert!(!sink.is_available());
    }

    #[test]
    fn test_mock_records_tones() {
        let mock = MockAlertSink::new();
        mock.play(&Tone::session_end()).unwrap();
        mock.play(&Tone::session_end()).unwrap();

        assert_eq!(mock.play_count(), 2);
        assert_eq!(mock.get_play_calls()[0], Tone::session_end());

        mock.clear_calls();
        assert_eq!(mock.play_count(), 0);
    }

    #[test]
    fn test_mock_failure() {
        let mock = MockAlertSink::new();
        mock.set_should_fail(true);

        assert!(mock.play(&Tone::session_end()).is_err());
        assert_eq!(mock.play_count(), 0);
    }

    #[test]
    fn test_try_create_sink_disabled_is_silent() {
        let sink = try_create_sink(true);
        assert!(!sink.is_available());
    }

    #[test]
    fn test_try_create_sink_never_panics() {
        // May be silent in a container without audio, that's expected
        let sink = try_create_sink(false);
        assert!(sink.play(&Tone::session_end()).is_ok());
    }
}
