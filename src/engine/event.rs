//! Change notifications emitted by the timer.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::types::{PomodoroConfig, SessionType};

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for front ends and external integrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TimerEvent {
    /// Countdown started from idle
    Started {
        session_type: SessionType,
        remaining: u32,
    },
    /// Countdown paused
    Paused { remaining: u32 },
    /// Countdown resumed after a pause
    Resumed { remaining: u32 },
    /// Countdown stopped and rewound to the full duration
    Stopped {
        session_type: SessionType,
        remaining: u32,
    },
    /// Session skipped without waiting for the countdown
    Skipped { from: SessionType, to: SessionType },
    /// Timer fully reinitialized
    Reset,
    /// One second elapsed
    Tick { remaining: u32 },
    /// Countdown reached zero and the next session is ready
    SessionCompleted {
        completed: SessionType,
        next: SessionType,
        completed_sessions: u32,
    },
    /// Configuration changed
    ConfigUpdated { config: PomodoroConfig },
}

// ============================================================================
// EventBus
// ============================================================================

/// Fan-out of timer events to any number of subscribers.
///
/// Subscribers whose receiver has been dropped are pruned on the next emit.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<mpsc::UnboundedSender<TimerEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber and returns its receiving end.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TimerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Sends `event` to every live subscriber.
    pub fn emit(&mut self, event: TimerEvent) {
        self.subscribers
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Number of subscribers still registered.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
