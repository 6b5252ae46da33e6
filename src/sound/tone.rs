//! Deterministic alert tone synthesis.
//!
//! The session-end alert is a short sine beep whose gain decays
//! exponentially. `ToneSource` renders it sample by sample so the same tone
//! always produces the same samples, and plugs into rodio as a `Source`.

use std::f32::consts::PI;
use std::time::Duration;

use rodio::Source;

/// Sample rate used for rendered tones.
pub const SAMPLE_RATE: u32 = 44_100;

/// Parameters of a synthesized tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Sine frequency in Hz.
    pub frequency_hz: f32,
    /// Length of the tone.
    pub duration: Duration,
    /// Gain at the first sample.
    pub start_gain: f32,
    /// Gain reached at the end of the tone.
    pub end_gain: f32,
}

impl Tone {
    /// The beep played when a session finishes: 800 Hz for half a second,
    /// decaying from 0.3 to 0.01.
    pub const fn session_end() -> Self {
        Self {
            frequency_hz: 800.0,
            duration: Duration::from_millis(500),
            start_gain: 0.3,
            end_gain: 0.01,
        }
    }

    /// Returns a sample source rendering this tone at [`SAMPLE_RATE`].
    #[must_use]
    pub fn source(&self) -> ToneSource {
        ToneSource::new(*self, SAMPLE_RATE)
    }
}

impl Default for Tone {
    fn default() -> Self {
        Self::session_end()
    }
}

/// Finite mono sample stream for a [`Tone`].
#[derive(Debug, Clone)]
pub struct ToneSource {
    tone: Tone,
    sample_rate: u32,
    total_samples: usize,
    position: usize,
}

impl ToneSource {
    pub fn new(tone: Tone, sample_rate: u32) -> Self {
        let total_samples = (tone.duration.as_secs_f64() * f64::from(sample_rate)).round() as usize;
        Self {
            tone,
            sample_rate,
            total_samples,
            position: 0,
        }
    }

    /// Number of samples the source yields in total.
    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    /// Envelope gain `t` seconds into the tone.
    ///
    /// Follows `start * (end / start) ^ (t / duration)`, held at the end gain
    /// past the tone's duration.
    pub fn gain_at(&self, t: f32) -> f32 {
        let Tone {
            start_gain,
            end_gain,
            duration,
            ..
        } = self.tone;
        if start_gain <= 0.0 || end_gain <= 0.0 {
            return 0.0;
        }
        let length = duration.as_secs_f32();
        if length <= 0.0 {
            return end_gain;
        }
        let progress = (t / length).clamp(0.0, 1.0);
        start_gain * (end_gain / start_gain).powf(progress)
    }
}

impl Iterator for ToneSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.total_samples {
            return None;
        }

        let t = self.position as f32 / self.sample_rate as f32;
        self.position += 1;

        let phase = 2.0 * PI * self.tone.frequency_hz * t;
        Some(self.gain_at(t) * phase.sin())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total_samples - self.position;
        (left, Some(left))
    }
}

impl Source for ToneSource {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.position)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.tone.duration)
    }
}
