//! One-second tick source for a running timer.
//!
//! At most one tick task exists per driver. Arming replaces any previous
//! task, so repeated starts never stack concurrent tick sources.
//!
//! Aborting only takes effect at the task's next `.await`, so a replaced
//! task can still be waiting on the timer lock. Each task therefore carries
//! the timer's tick generation and ticks only while it is still current.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Duration, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::timer::{TickOutcome, Timer};

/// Interval between two ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Timer shared between the engine facade and the tick task.
pub type SharedTimer = Arc<Mutex<Timer>>;

/// Locks the timer, recovering the guard if a previous holder panicked.
pub(crate) fn lock_timer(timer: &Mutex<Timer>) -> MutexGuard<'_, Timer> {
    timer.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the background task that ticks a shared timer.
#[derive(Debug)]
pub struct TickDriver {
    handle: Option<JoinHandle<()>>,
    period: Duration,
}

impl Default for TickDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl TickDriver {
    pub fn new() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    /// Driver with a custom tick period.
    pub fn with_period(period: Duration) -> Self {
        Self {
            handle: None,
            period,
        }
    }

    /// Starts ticking `timer` once per period, replacing any previous task.
    ///
    /// `generation` must come from `Timer::next_tick_generation`. The first
    /// tick fires one full period after arming. The task ends by itself when
    /// the timer stops running, a session completes or a newer generation
    /// takes over.
    ///
    /// Returns false if there is no tokio runtime to spawn on.
    pub fn arm(&mut self, timer: SharedTimer, generation: u64) -> bool {
        self.disarm();

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                warn!("Cannot start tick source: {}", e);
                return false;
            }
        };

        let period = self.period;
        self.handle = Some(runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let mut guard = lock_timer(&timer);
                if guard.tick_generation() != generation {
                    debug!(generation, "Tick source superseded");
                    break;
                }
                match guard.tick() {
                    TickOutcome::Counted { .. } => {}
                    TickOutcome::Idle => break,
                    TickOutcome::Completed { .. } => {
                        debug!("Tick source finished with the session");
                        break;
                    }
                }
            }
        }));
        true
    }

    /// Cancels the tick task, if any. Idempotent.
    pub fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether a tick task is currently alive.
    pub fn is_armed(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.disarm();
    }
}
