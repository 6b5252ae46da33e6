//! Pomodoro timer engine.
//!
//! This module ties the pieces of the timer together:
//! - `timer`: the synchronous session state machine
//! - `driver`: the one-second tick source
//! - `event`: change notifications for front ends
//!
//! [`TimerEngine`] is the facade that front ends talk to. It is cheap to
//! clone; all clones control the same timer.
//!
//! # Example
//!
//! ```rust,no_run
//! use pomodoro::engine::TimerEngine;
//! use pomodoro::types::PomodoroConfig;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let engine = TimerEngine::builder()
//!     .config(PomodoroConfig::default())
//!     .build();
//! let mut events = engine.subscribe();
//!
//! engine.start();
//! while let Some(event) = events.recv().await {
//!     println!("{:?}", event);
//! }
//! # }
//! ```

mod driver;
mod event;
mod timer;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing::debug;

pub use self::driver::{SharedTimer, TickDriver, TICK_PERIOD};
pub use self::event::{EventBus, TimerEvent};
pub use self::timer::{TickOutcome, Timer, TimerSnapshot};

use self::driver::lock_timer;
use crate::notification::{NotificationSink, SilentNotificationSink};
use crate::sound::{AlertSink, SilentAlertSink};
use crate::types::{ConfigUpdate, PomodoroConfig, SessionState, TimerStatus};

// ============================================================================
// TimerEngine
// ============================================================================

/// Shared handle to a running Pomodoro timer.
///
/// Control operations never fail. Calls that do not apply to the current
/// state are no-ops and return `false`.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    timer: SharedTimer,
    driver: Arc<Mutex<TickDriver>>,
}

impl TimerEngine {
    /// Engine with the default configuration and silent side effects.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> TimerEngineBuilder {
        TimerEngineBuilder::default()
    }

    // Lock order is driver, then timer. The tick task only takes the timer.
    fn lock_driver(&self) -> MutexGuard<'_, TickDriver> {
        self.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_timer(&self) -> MutexGuard<'_, Timer> {
        lock_timer(&self.timer)
    }

    /// Runs `op` against the timer and rearms or disarms the tick source to
    /// match the resulting status.
    fn control(&self, op: impl FnOnce(&mut Timer) -> bool) -> bool {
        let mut driver = self.lock_driver();
        let (generation, running) = {
            let mut timer = self.lock_timer();
            if !op(&mut timer) {
                return false;
            }
            // Retire the old tick source before the timer lock is released.
            (
                timer.next_tick_generation(),
                timer.status() == TimerStatus::Running,
            )
        };

        if running {
            debug!(generation, "Arming tick source");
            driver.arm(Arc::clone(&self.timer), generation);
        } else if driver.is_armed() {
            debug!("Disarming tick source");
            driver.disarm();
        }
        true
    }

    /// Starts the countdown, or resumes it when paused.
    pub fn start(&self) -> bool {
        self.control(Timer::start)
    }

    pub fn pause(&self) -> bool {
        self.control(Timer::pause)
    }

    pub fn resume(&self) -> bool {
        self.control(Timer::resume)
    }

    /// Stops and rewinds the current session.
    pub fn stop(&self) -> bool {
        self.control(Timer::stop)
    }

    /// Moves to the next session without alert or notification.
    pub fn skip(&self) -> bool {
        self.control(Timer::skip)
    }

    /// Back to an idle work session with no completed sessions.
    pub fn reset_all(&self) -> bool {
        self.control(Timer::reset_all)
    }

    /// Merges a partial configuration. A running or paused countdown is
    /// left untouched and the tick source keeps going.
    ///
    /// Returns true if the remaining time was recomputed.
    pub fn update_config(&self, update: &ConfigUpdate) -> bool {
        self.lock_timer().update_config(update)
    }

    pub fn config(&self) -> PomodoroConfig {
        *self.lock_timer().config()
    }

    pub fn state(&self) -> SessionState {
        *self.lock_timer().state()
    }

    pub fn current_session_type_label(&self) -> &'static str {
        self.lock_timer().label()
    }

    pub fn formatted_time(&self) -> String {
        self.lock_timer().formatted_time()
    }

    pub fn progress(&self) -> f64 {
        self.lock_timer().progress()
    }

    /// Consistent read of state, config and derived values.
    pub fn snapshot(&self) -> TimerSnapshot {
        self.lock_timer().snapshot()
    }

    /// Registers a subscriber for timer events.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<TimerEvent> {
        self.lock_timer().subscribe()
    }

    /// Asks for notification permission if it has not been decided yet.
    ///
    /// Returns immediately; the answer is handled in the background.
    pub fn request_notification_permission(&self) {
        let notifier = self.lock_timer().notifier();
        notifier.ensure_permission();
    }

    /// Whether the tick source is active.
    pub fn is_ticking(&self) -> bool {
        self.lock_driver().is_armed()
    }

    /// Cancels the tick source. The timer state is kept.
    pub fn shutdown(&self) {
        let mut driver = self.lock_driver();
        self.lock_timer().next_tick_generation();
        driver.disarm();
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TimerEngineBuilder
// ============================================================================

/// Builder for [`TimerEngine`].
pub struct TimerEngineBuilder {
    config: PomodoroConfig,
    alert: Arc<dyn AlertSink>,
    notifier: Arc<dyn NotificationSink>,
    period: Duration,
}

impl Default for TimerEngineBuilder {
    fn default() -> Self {
        Self {
            config: PomodoroConfig::default(),
            alert: Arc::new(SilentAlertSink),
            notifier: Arc::new(SilentNotificationSink),
            period: TICK_PERIOD,
        }
    }
}

impl TimerEngineBuilder {
    pub fn config(mut self, config: PomodoroConfig) -> Self {
        self.config = config;
        self
    }

    pub fn alert_sink(mut self, alert: Arc<dyn AlertSink>) -> Self {
        self.alert = alert;
        self
    }

    pub fn notification_sink(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Overrides the one-second tick period.
    pub fn tick_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn build(self) -> TimerEngine {
        TimerEngine {
            timer: Arc::new(Mutex::new(Timer::new(
                self.config,
                self.alert,
                self.notifier,
            ))),
            driver: Arc::new(Mutex::new(TickDriver::with_period(self.period))),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
