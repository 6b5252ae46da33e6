//! Core data types for the Pomodoro Timer.
//!
//! This module defines the data structures used for:
//! - Session typing and the fixed label set
//! - Timer configuration, partial updates and the clamping validation layer
//! - Session state and the `MM:SS` formatter

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lower bound for any duration field, in minutes.
pub const MIN_MINUTES: u32 = 1;

/// Upper bound for any duration field, in minutes.
pub const MAX_MINUTES: u32 = 60;

/// Lower bound for the number of work sessions before a long break.
pub const MIN_SESSIONS: u32 = 1;

/// Upper bound for the number of work sessions before a long break.
pub const MAX_SESSIONS: u32 = 10;

// ============================================================================
// SessionType
// ============================================================================

/// Kind of interval the timer is currently counting down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionType {
    /// Focused work interval
    #[default]
    Work,
    /// Short break between work sessions
    ShortBreak,
    /// Long break after a full cycle of work sessions
    LongBreak,
}

impl SessionType {
    /// Returns the human-readable label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Work => "Sesión de Trabajo",
            SessionType::ShortBreak => "Descanso Corto",
            SessionType::LongBreak => "Descanso Largo",
        }
    }

    /// Returns the string representation of the session type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Work => "work",
            SessionType::ShortBreak => "shortBreak",
            SessionType::LongBreak => "longBreak",
        }
    }
}

// ============================================================================
// TimerStatus
// ============================================================================

/// Coarse state of the countdown, derived from the running/paused flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    /// Not counting down
    Idle,
    /// Counting down
    Running,
    /// Countdown suspended, remaining time preserved
    Paused,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
        }
    }
}

// ============================================================================
// ConfigError
// ============================================================================

/// Violations of the configuration invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A duration field is zero.
    #[error("la duración de {field} debe ser mayor que 0 minutos")]
    ZeroDuration {
        /// Name of the offending field
        field: &'static str,
    },

    /// The cycle length is zero.
    #[error("el número de sesiones antes del descanso largo debe ser al menos 1")]
    ZeroCycleLength,
}

impl ConfigError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::ZeroDuration { .. } => "use un valor entre 1 y 60 minutos",
            Self::ZeroCycleLength => "use un valor entre 1 y 10 sesiones",
        }
    }
}

// ============================================================================
// PomodoroConfig
// ============================================================================

/// Configuration for the Pomodoro timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroConfig {
    /// Work duration in minutes
    pub work_duration: u32,
    /// Short break duration in minutes
    pub short_break_duration: u32,
    /// Long break duration in minutes
    pub long_break_duration: u32,
    /// Completed work sessions before a long break replaces the short one
    pub sessions_before_long_break: u32,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            work_duration: 25,
            short_break_duration: 5,
            long_break_duration: 15,
            sessions_before_long_break: 4,
        }
    }
}

impl PomodoroConfig {
    /// Creates a new configuration with the specified work duration.
    pub fn with_work_duration(mut self, minutes: u32) -> Self {
        self.work_duration = minutes;
        self
    }

    /// Creates a new configuration with the specified short break duration.
    pub fn with_short_break_duration(mut self, minutes: u32) -> Self {
        self.short_break_duration = minutes;
        self
    }

    /// Creates a new configuration with the specified long break duration.
    pub fn with_long_break_duration(mut self, minutes: u32) -> Self {
        self.long_break_duration = minutes;
        self
    }

    /// Creates a new configuration with the specified cycle length.
    pub fn with_sessions_before_long_break(mut self, sessions: u32) -> Self {
        self.sessions_before_long_break = sessions;
        self
    }

    /// Configured duration of a session type, in minutes.
    pub fn duration_minutes(&self, session_type: SessionType) -> u32 {
        match session_type {
            SessionType::Work => self.work_duration,
            SessionType::ShortBreak => self.short_break_duration,
            SessionType::LongBreak => self.long_break_duration,
        }
    }

    /// Configured duration of a session type, in seconds.
    pub fn duration_seconds(&self, session_type: SessionType) -> u32 {
        self.duration_minutes(session_type) * 60
    }

    /// Merges the fields present in `update`, keeping the others.
    pub fn apply(&mut self, update: &ConfigUpdate) {
        if let Some(minutes) = update.work_duration {
            self.work_duration = minutes;
        }
        if let Some(minutes) = update.short_break_duration {
            self.short_break_duration = minutes;
        }
        if let Some(minutes) = update.long_break_duration {
            self.long_break_duration = minutes;
        }
        if let Some(sessions) = update.sessions_before_long_break {
            self.sessions_before_long_break = sessions;
        }
    }

    /// Checks the configuration invariants.
    ///
    /// Only positivity is enforced here; the upper bounds belong to the
    /// clamping layer in [`ConfigUpdate::clamped`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("trabajo", self.work_duration),
            ("descanso corto", self.short_break_duration),
            ("descanso largo", self.long_break_duration),
        ];
        for (field, minutes) in durations {
            if minutes == 0 {
                return Err(ConfigError::ZeroDuration { field });
            }
        }
        if self.sessions_before_long_break == 0 {
            return Err(ConfigError::ZeroCycleLength);
        }
        Ok(())
    }
}

// ============================================================================
// ConfigUpdate
// ============================================================================

/// Partial configuration: only the fields that are `Some` are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_break_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_break_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions_before_long_break: Option<u32>,
}

impl ConfigUpdate {
    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.work_duration.is_none()
            && self.short_break_duration.is_none()
            && self.long_break_duration.is_none()
            && self.sessions_before_long_break.is_none()
    }

    /// Clamps every present field into its accepted range.
    ///
    /// Minutes are clamped to [`MIN_MINUTES`]..=[`MAX_MINUTES`] and the
    /// session count to [`MIN_SESSIONS`]..=[`MAX_SESSIONS`]. The engine does
    /// not re-check values, so callers run updates through here first.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            work_duration: self.work_duration.map(clamp_minutes),
            short_break_duration: self.short_break_duration.map(clamp_minutes),
            long_break_duration: self.long_break_duration.map(clamp_minutes),
            sessions_before_long_break: self.sessions_before_long_break.map(clamp_sessions),
        }
    }
}

impl From<PomodoroConfig> for ConfigUpdate {
    fn from(config: PomodoroConfig) -> Self {
        Self {
            work_duration: Some(config.work_duration),
            short_break_duration: Some(config.short_break_duration),
            long_break_duration: Some(config.long_break_duration),
            sessions_before_long_break: Some(config.sessions_before_long_break),
        }
    }
}

/// Clamps a minute value into the accepted range.
pub fn clamp_minutes(minutes: u32) -> u32 {
    minutes.clamp(MIN_MINUTES, MAX_MINUTES)
}

/// Clamps a session count into the accepted range.
pub fn clamp_sessions(sessions: u32) -> u32 {
    sessions.clamp(MIN_SESSIONS, MAX_SESSIONS)
}

// ============================================================================
// SessionState
// ============================================================================

/// Represents the current state of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Session type being counted down
    pub current_session_type: SessionType,
    /// Remaining seconds in the current session
    pub time_remaining: u32,
    /// True while counting down or paused
    pub is_running: bool,
    /// True while paused
    pub is_paused: bool,
    /// Number of completed work sessions
    pub completed_sessions: u32,
}

impl SessionState {
    /// Creates the initial state: an idle work session at full duration.
    pub fn new(config: &PomodoroConfig) -> Self {
        Self {
            current_session_type: SessionType::Work,
            time_remaining: config.duration_seconds(SessionType::Work),
            is_running: false,
            is_paused: false,
            completed_sessions: 0,
        }
    }

    /// Returns the coarse status derived from the flags.
    pub fn status(&self) -> TimerStatus {
        if self.is_paused {
            TimerStatus::Paused
        } else if self.is_running {
            TimerStatus::Running
        } else {
            TimerStatus::Idle
        }
    }
}

/// Formats seconds as `MM:SS`, zero-padded.
///
/// Minutes are not capped, so 100 minutes render as `100:00`.
pub fn format_time(total_seconds: u32) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

// ============================================================================
// Tests
// ============================================================================
