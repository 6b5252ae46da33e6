//! Sound system error types.
//!
//! None of these errors reach the timer: a failed alert is logged and the
//! session transition proceeds regardless.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("dispositivo de audio no disponible: {0}")]
    DeviceNotAvailable(String),

    /// Failed to create the audio output stream or sink.
    #[error("no se pudo crear el flujo de audio: {0}")]
    StreamError(String),

    /// The audio thread is gone and no longer accepts tones.
    #[error("el hilo de audio se ha detenido")]
    Disconnected,

    /// Generic sound playback error.
    #[error("error de reproducción: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to device availability.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotAvailable(_) | Self::StreamError(_))
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "conecte un dispositivo de audio",
            Self::StreamError(_) => "revise la configuración de audio del sistema",
            Self::Disconnected => "reinicie la aplicación",
            Self::PlaybackError(_) => "use --no-sound para desactivar el sonido",
        }
    }
}
