//! Alert playback using rodio.
//!
//! rodio's `OutputStream` cannot move between threads, so `RodioAlertSink`
//! parks it on a dedicated audio thread and hands tones over a channel. The
//! sink itself is `Send + Sync` and can live inside the timer.

use std::thread;

use crossbeam_channel::{bounded, unbounded, Sender};
use rodio::{OutputStream, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::tone::Tone;

/// An alert sink that renders tones through the default audio device.
pub struct RodioAlertSink {
    /// Channel to the audio thread.
    tx: Sender<Tone>,
}

impl RodioAlertSink {
    /// Opens the default output device on a new audio thread.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available, or `SoundError::StreamError` if the thread cannot start.
    pub fn new() -> Result<Self, SoundError> {
        let (tx, rx) = unbounded::<Tone>();
        let (ready_tx, ready_rx) = bounded::<Result<(), SoundError>>(1);

        thread::Builder::new()
            .name("pomodoro-audio".to_string())
            .spawn(move || {
                let (_stream, handle) = match OutputStream::try_default() {
                    Ok(pair) => {
                        let _ = ready_tx.send(Ok(()));
                        pair
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(SoundError::DeviceNotAvailable(e.to_string())));
                        return;
                    }
                };

                debug!("Audio output stream initialized");

                // Runs until every sender is dropped.
                for tone in rx.iter() {
                    match Sink::try_new(&handle) {
                        Ok(sink) => {
                            sink.append(tone.source());
                            sink.detach();
                            debug!("Alert tone started (detached)");
                        }
                        Err(e) => warn!("Failed to create audio sink: {}", e),
                    }
                }

                debug!("Audio thread exiting");
            })
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| SoundError::DeviceNotAvailable("audio thread exited".to_string()))??;

        Ok(Self { tx })
    }

    /// Queues a tone for playback; returns without waiting for it to finish.
    pub fn play(&self, tone: &Tone) -> Result<(), SoundError> {
        self.tx.send(*tone).map_err(|_| SoundError::Disconnected)
    }
}

impl std::fmt::Debug for RodioAlertSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioAlertSink").finish_non_exhaustive()
    }
}
