//! Session state machine for the Pomodoro Timer.
//!
//! This module provides the synchronous core:
//! - State transitions (Idle ⇄ Running ⇄ Paused)
//! - Countdown bookkeeping, one `tick()` per elapsed second
//! - Session-type transitions (work → short break → … → long break)
//! - Configuration merges while a countdown is in flight
//! - Alert and notification dispatch at the end of a session
//!
//! `Timer` has no notion of wall-clock time; the tick driver calls
//! [`Timer::tick`] once per second while the timer is running.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::event::{EventBus, TimerEvent};
use crate::notification::{self, NotificationContent, NotificationSink};
use crate::sound::{AlertSink, Tone};
use crate::types::{
    format_time, ConfigUpdate, PomodoroConfig, SessionState, SessionType, TimerStatus,
};

// ============================================================================
// TickOutcome
// ============================================================================

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The timer was not running; nothing changed.
    Idle,
    /// One second was counted down.
    Counted { remaining: u32 },
    /// The countdown finished and the timer moved to the next session.
    Completed {
        completed: SessionType,
        next: SessionType,
    },
}

// ============================================================================
// TimerSnapshot
// ============================================================================

/// Read model of the timer, including the derived display values.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub config: PomodoroConfig,
    pub state: SessionState,
    pub status: TimerStatus,
    pub label: &'static str,
    pub formatted_time: String,
    pub progress: f64,
}

// ============================================================================
// Timer
// ============================================================================

/// Pomodoro state machine with its configuration and side-effect sinks.
pub struct Timer {
    config: PomodoroConfig,
    state: SessionState,
    alert: Arc<dyn AlertSink>,
    notifier: Arc<dyn NotificationSink>,
    events: EventBus,
    /// Identifies the tick source currently allowed to tick.
    tick_generation: u64,
}

impl Timer {
    /// Creates an idle timer at the start of a work session.
    pub fn new(
        config: PomodoroConfig,
        alert: Arc<dyn AlertSink>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            state: SessionState::new(&config),
            config,
            alert,
            notifier,
            events: EventBus::new(),
            tick_generation: 0,
        }
    }

    /// Retires every tick source handed an earlier generation and returns
    /// the generation for the next one.
    pub fn next_tick_generation(&mut self) -> u64 {
        self.tick_generation = self.tick_generation.wrapping_add(1);
        self.tick_generation
    }

    /// Generation of the tick source currently allowed to tick.
    pub fn tick_generation(&self) -> u64 {
        self.tick_generation
    }

    /// Starts the countdown, or resumes it when paused.
    ///
    /// Returns false if the timer was already counting down.
    pub fn start(&mut self) -> bool {
        if self.state.is_running && !self.state.is_paused {
            return false;
        }

        let resuming = self.state.is_paused;
        self.state.is_running = true;
        self.state.is_paused = false;

        let remaining = self.state.time_remaining;
        if resuming {
            debug!("Resumed {} at {}", self.label(), self.formatted_time());
            self.events.emit(TimerEvent::Resumed { remaining });
        } else {
            debug!("Started {} at {}", self.label(), self.formatted_time());
            self.events.emit(TimerEvent::Started {
                session_type: self.state.current_session_type,
                remaining,
            });
        }
        true
    }

    /// Pauses a running countdown, keeping the remaining time.
    ///
    /// Returns false unless the timer was running.
    pub fn pause(&mut self) -> bool {
        if self.status() != TimerStatus::Running {
            return false;
        }

        self.state.is_paused = true;
        debug!("Paused at {}", self.formatted_time());
        self.events.emit(TimerEvent::Paused {
            remaining: self.state.time_remaining,
        });
        true
    }

    /// Resumes a paused countdown.
    ///
    /// Returns false unless the timer was paused.
    pub fn resume(&mut self) -> bool {
        if !self.state.is_paused {
            return false;
        }
        self.start()
    }

    /// Stops the countdown and rewinds the current session to its full
    /// duration. The session type and completed count are kept.
    pub fn stop(&mut self) -> bool {
        let session_type = self.state.current_session_type;
        self.state.time_remaining = self.config.duration_seconds(session_type);
        self.state.is_running = false;
        self.state.is_paused = false;

        debug!("Stopped {}", session_type.label());
        self.events.emit(TimerEvent::Stopped {
            session_type,
            remaining: self.state.time_remaining,
        });
        true
    }

    /// Moves to the next session immediately, without alert or notification.
    pub fn skip(&mut self) -> bool {
        let from = self.state.current_session_type;
        let to = self.advance();

        debug!("Skipped {} -> {}", from.label(), to.label());
        self.events.emit(TimerEvent::Skipped { from, to });
        true
    }

    /// Reinitializes the timer: idle work session, zero completed sessions.
    pub fn reset_all(&mut self) -> bool {
        self.state = SessionState::new(&self.config);

        debug!("Timer reset");
        self.events.emit(TimerEvent::Reset);
        true
    }

    /// Merges `update` into the configuration.
    ///
    /// While idle the remaining time is recomputed from the new
    /// configuration, discarding partial progress. A running or paused
    /// countdown keeps its remaining time; the change applies from the next
    /// session on. Values are taken as given; see [`ConfigUpdate::clamped`].
    ///
    /// Returns true if the remaining time was recomputed.
    pub fn update_config(&mut self, update: &ConfigUpdate) -> bool {
        self.config.apply(update);

        let recomputed = !self.state.is_running;
        if recomputed {
            self.state.time_remaining = self
                .config
                .duration_seconds(self.state.current_session_type);
        }

        debug!(?update, recomputed, "Configuration updated");
        self.events.emit(TimerEvent::ConfigUpdated {
            config: self.config,
        });
        recomputed
    }

    /// Counts down one second.
    ///
    /// The tick that brings the countdown to zero finishes the session: the
    /// alert plays, the notification is dispatched and the timer moves to
    /// the next session, idle.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status() != TimerStatus::Running {
            return TickOutcome::Idle;
        }

        if self.state.time_remaining > 0 {
            self.state.time_remaining -= 1;
        }

        let remaining = self.state.time_remaining;
        self.events.emit(TimerEvent::Tick { remaining });

        if remaining > 0 {
            return TickOutcome::Counted { remaining };
        }

        let completed = self.state.current_session_type;
        self.dispatch_side_effects(completed);
        let next = self.advance();

        info!("{} completed, next: {}", completed.label(), next.label());
        self.events.emit(TimerEvent::SessionCompleted {
            completed,
            next,
            completed_sessions: self.state.completed_sessions,
        });
        TickOutcome::Completed { completed, next }
    }

    /// Applies the session-type transition rule and returns the new type.
    fn advance(&mut self) -> SessionType {
        let next = match self.state.current_session_type {
            SessionType::Work => {
                self.state.completed_sessions += 1;
                let cycle = self.config.sessions_before_long_break.max(1);
                if self.state.completed_sessions % cycle == 0 {
                    SessionType::LongBreak
                } else {
                    SessionType::ShortBreak
                }
            }
            SessionType::ShortBreak | SessionType::LongBreak => SessionType::Work,
        };

        self.state.current_session_type = next;
        self.state.time_remaining = self.config.duration_seconds(next);
        self.state.is_running = false;
        self.state.is_paused = false;
        next
    }

    fn dispatch_side_effects(&self, completed: SessionType) {
        if let Err(e) = self.alert.play(&Tone::session_end()) {
            warn!("Alert sound failed: {} ({})", e, e.suggestion());
        }
        notification::dispatch(
            self.notifier.as_ref(),
            NotificationContent::session_complete(completed),
        );
    }

    /// Registers a subscriber for timer events.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TimerEvent> {
        self.events.subscribe()
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &PomodoroConfig {
        &self.config
    }

    /// Returns a reference to the current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status()
    }

    /// Label of the current session type.
    pub fn label(&self) -> &'static str {
        self.state.current_session_type.label()
    }

    /// Remaining time as `MM:SS`.
    pub fn formatted_time(&self) -> String {
        format_time(self.state.time_remaining)
    }

    /// Full length of the current session under the current configuration.
    pub fn total_seconds(&self) -> u32 {
        self.config
            .duration_seconds(self.state.current_session_type)
    }

    /// Elapsed share of the current session, 0 to 100.
    ///
    /// A countdown that outlasts a shortened configuration reads as 0.
    pub fn progress(&self) -> f64 {
        let total = f64::from(self.total_seconds());
        if total == 0.0 {
            return 0.0;
        }
        let elapsed = total - f64::from(self.state.time_remaining);
        (elapsed / total * 100.0).clamp(0.0, 100.0)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            config: self.config,
            state: self.state,
            status: self.status(),
            label: self.label(),
            formatted_time: self.formatted_time(),
            progress: self.progress(),
        }
    }

    /// Handle to the notification sink, for permission requests.
    pub fn notifier(&self) -> Arc<dyn NotificationSink> {
        Arc::clone(&self.notifier)
    }

    /// Returns a mutable reference to the session state (for testing).
    #[cfg(test)]
    pub fn get_state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("subscribers", &self.events.subscriber_count())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
