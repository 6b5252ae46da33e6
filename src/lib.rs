//! Pomodoro Timer Library
//!
//! This library provides the core functionality for the Pomodoro Timer CLI.
//! It includes:
//! - Timer engine: session state machine, one-second tick driver and events
//! - Type definitions for configuration and session state
//! - Alert tone playback for session transitions
//! - Desktop notifications (UNUserNotificationCenter on macOS)
//! - CLI command parsing, the interactive runner and display utilities

pub mod cli;
pub mod engine;
pub mod notification;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    format_time, ConfigError, ConfigUpdate, PomodoroConfig, SessionState, SessionType,
    TimerStatus,
};

// Re-export engine types
pub use engine::{TimerEngine, TimerEngineBuilder, TimerEvent, TimerSnapshot};

// Re-export side-effect capabilities
pub use notification::{
    MockNotificationSink, NotificationContent, NotificationError, NotificationSink, Permission,
};
pub use sound::{AlertSink, MockAlertSink, SoundError, Tone};
