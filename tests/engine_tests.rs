//! End-to-end tests for the timer engine.
//!
//! These tests drive the public `TimerEngine` API with paused tokio time
//! and mock side-effect sinks:
//! - Complete work session and transition to a break
//! - Long break after the configured number of work sessions
//! - Pause and resume flow
//! - Stop, skip and reset flows
//! - Configuration changes while idle and while counting down
//! - Event stream contents

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Duration;

use pomodoro::engine::{TimerEngine, TimerEvent};
use pomodoro::notification::{MockNotificationSink, NotificationContent, Permission};
use pomodoro::sound::{MockAlertSink, Tone};
use pomodoro::types::{ConfigUpdate, PomodoroConfig, SessionState, SessionType, TimerStatus};

// ============================================================================
// Test Helpers
// ============================================================================

struct Fixture {
    engine: TimerEngine,
    alert: Arc<MockAlertSink>,
    notifier: Arc<MockNotificationSink>,
}

fn create_fixture(config: PomodoroConfig) -> Fixture {
    let alert = Arc::new(MockAlertSink::new());
    let notifier = Arc::new(MockNotificationSink::new());
    let engine = TimerEngine::builder()
        .config(config)
        .alert_sink(alert.clone())
        .notification_sink(notifier.clone())
        .build();
    Fixture {
        engine,
        alert,
        notifier,
    }
}

/// One-minute sessions everywhere, so a full cycle runs in a few minutes
/// of virtual time.
fn create_fast_config() -> PomodoroConfig {
    PomodoroConfig::default()
        .with_work_duration(1)
        .with_short_break_duration(1)
        .with_long_break_duration(2)
}

async fn advance_secs(secs: u64) {
    tokio::time::sleep(Duration::from_secs(secs) + Duration::from_millis(500)).await;
    tokio::task::yield_now().await;
}

/// Starts the current session and lets it run to completion.
async fn complete_session(engine: &TimerEngine) {
    let seconds = u64::from(engine.state().time_remaining);
    engine.start();
    tokio::time::sleep(Duration::from_secs(seconds) + Duration::from_millis(500)).await;
    tokio::task::yield_now().await;
}

fn drain(events: &mut mpsc::UnboundedReceiver<TimerEvent>) -> Vec<TimerEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

// ============================================================================
// Complete Session Flow
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_default_work_session_completes_after_1500_seconds() {
    let f = create_fixture(PomodoroConfig::default());

    f.engine.start();
    advance_secs(1499).await;
    assert_eq!(f.engine.formatted_time(), "00:01");
    assert_eq!(f.alert.play_count(), 0);

    advance_secs(1).await;

    let state = f.engine.state();
    assert_eq!(state.current_session_type, SessionType::ShortBreak);
    assert_eq!(state.time_remaining, 300);
    assert_eq!(state.completed_sessions, 1);
    assert_eq!(state.status(), TimerStatus::Idle);
    assert_eq!(f.engine.current_session_type_label(), "Descanso Corto");
    assert_eq!(f.engine.progress(), 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_completion_plays_alert_and_notifies_once() {
    let f = create_fixture(create_fast_config());

    complete_session(&f.engine).await;
    advance_secs(10).await;

    assert_eq!(f.alert.get_play_calls(), vec![Tone::session_end()]);
    let notifications = f.notifier.get_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Temporizador Pomodoro");
    assert_eq!(notifications[0].body, "¡Sesión de Trabajo completada!");
}

#[tokio::test(start_paused = true)]
async fn test_next_session_waits_for_start() {
    let f = create_fixture(create_fast_config());

    complete_session(&f.engine).await;
    advance_secs(30).await;

    assert_eq!(f.engine.state().time_remaining, 60);
    assert!(!f.engine.is_ticking());
}

#[tokio::test(start_paused = true)]
async fn test_full_cycle_reaches_long_break() {
    let f = create_fixture(create_fast_config());
    let mut sequence = Vec::new();

    for _ in 0..8 {
        complete_session(&f.engine).await;
        sequence.push(f.engine.state().current_session_type);
    }

    assert_eq!(
        sequence,
        vec![
            SessionType::ShortBreak,
            SessionType::Work,
            SessionType::ShortBreak,
            SessionType::Work,
            SessionType::ShortBreak,
            SessionType::Work,
            SessionType::LongBreak,
            SessionType::Work,
        ]
    );
    assert_eq!(f.engine.state().completed_sessions, 4);
    assert_eq!(f.alert.play_count(), 8);

    let bodies: Vec<String> = f
        .notifier
        .get_notifications()
        .into_iter()
        .map(|n| n.body)
        .collect();
    assert_eq!(bodies[5], "¡Descanso Corto completada!");
    assert_eq!(bodies[6], "¡Sesión de Trabajo completada!");
    assert_eq!(bodies[7], "¡Descanso Largo completada!");
}

#[tokio::test(start_paused = true)]
async fn test_long_break_duration_applied() {
    let f = create_fixture(create_fast_config().with_sessions_before_long_break(1));

    complete_session(&f.engine).await;

    assert_eq!(
        f.engine.state().current_session_type,
        SessionType::LongBreak
    );
    assert_eq!(f.engine.formatted_time(), "02:00");
}

// ============================================================================
// Pause / Resume Flow
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_pause_freezes_countdown() {
    let f = create_fixture(PomodoroConfig::default());

    f.engine.start();
    advance_secs(10).await;
    assert!(f.engine.pause());
    let frozen = f.engine.state().time_remaining;

    advance_secs(120).await;
    assert_eq!(f.engine.state().time_remaining, frozen);
    assert_eq!(f.engine.state().status(), TimerStatus::Paused);

    assert!(f.engine.resume());
    advance_secs(5).await;
    assert_eq!(f.engine.state().time_remaining, frozen - 5);
}

#[tokio::test(start_paused = true)]
async fn test_repeated_start_does_not_double_speed() {
    let f = create_fixture(PomodoroConfig::default());

    for _ in 0..5 {
        f.engine.start();
    }
    advance_secs(10).await;

    assert_eq!(f.engine.state().time_remaining, 1490);
}

#[tokio::test(start_paused = true)]
async fn test_pause_resume_cycles_do_not_stack_tick_sources() {
    let f = create_fixture(PomodoroConfig::default());

    for _ in 0..3 {
        f.engine.start();
        advance_secs(2).await;
        f.engine.pause();
        f.engine.resume();
    }
    let before = f.engine.state().time_remaining;
    advance_secs(4).await;

    assert_eq!(f.engine.state().time_remaining, before - 4);
}

// ============================================================================
// Stop / Skip / Reset Flow
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_stop_rewinds_and_keeps_progress() {
    let f = create_fixture(create_fast_config());

    complete_session(&f.engine).await;
    f.engine.start();
    advance_secs(20).await;
    f.engine.stop();

    let state = f.engine.state();
    assert_eq!(state.current_session_type, SessionType::ShortBreak);
    assert_eq!(state.time_remaining, 60);
    assert_eq!(state.completed_sessions, 1);
    assert_eq!(state.status(), TimerStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_skip_has_no_side_effects() {
    let f = create_fixture(create_fast_config());

    f.engine.start();
    advance_secs(5).await;
    f.engine.skip();
    f.engine.skip();

    assert_eq!(f.engine.state().current_session_type, SessionType::Work);
    assert_eq!(f.engine.state().completed_sessions, 1);
    assert_eq!(f.alert.play_count(), 0);
    assert_eq!(f.notifier.notification_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_reset_all_returns_to_initial_state() {
    let f = create_fixture(PomodoroConfig::default());

    f.engine.skip();
    f.engine.skip();
    f.engine.start();
    advance_secs(30).await;
    f.engine.reset_all();
    advance_secs(5).await;

    assert_eq!(
        f.engine.state(),
        SessionState::new(&PomodoroConfig::default())
    );
}

// ============================================================================
// Configuration Flow
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_config_change_while_idle_recomputes() {
    let f = create_fixture(PomodoroConfig::default());

    f.engine.update_config(&ConfigUpdate {
        work_duration: Some(45),
        ..ConfigUpdate::default()
    });

    assert_eq!(f.engine.formatted_time(), "45:00");
}

#[tokio::test(start_paused = true)]
async fn test_config_change_while_running_applies_next_session() {
    let f = create_fixture(create_fast_config());

    f.engine.start();
    advance_secs(10).await;
    f.engine.update_config(&ConfigUpdate {
        work_duration: Some(3),
        short_break_duration: Some(4),
        ..ConfigUpdate::default()
    });
    assert_eq!(f.engine.state().time_remaining, 50);

    advance_secs(50).await;

    assert_eq!(
        f.engine.state().current_session_type,
        SessionType::ShortBreak
    );
    assert_eq!(f.engine.formatted_time(), "04:00");
}

#[tokio::test(start_paused = true)]
async fn test_clamped_update_keeps_invariants() {
    let f = create_fixture(PomodoroConfig::default());

    f.engine.update_config(
        &ConfigUpdate {
            work_duration: Some(0),
            sessions_before_long_break: Some(0),
            ..ConfigUpdate::default()
        }
        .clamped(),
    );

    assert!(f.engine.config().validate().is_ok());
    assert_eq!(f.engine.state().time_remaining, 60);
}

// ============================================================================
// Notification Permission
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_denied_permission_still_plays_alert() {
    let f = create_fixture(create_fast_config());
    f.notifier.set_permission(Permission::Denied);

    complete_session(&f.engine).await;

    assert_eq!(f.alert.play_count(), 1);
    assert_eq!(f.notifier.notification_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_undetermined_permission_shows_after_grant() {
    let f = create_fixture(create_fast_config());
    f.notifier.set_permission(Permission::Undetermined);
    f.notifier.set_grant_on_request(true);

    complete_session(&f.engine).await;

    assert_eq!(f.notifier.permission_request_count(), 1);
    assert_eq!(
        f.notifier.get_notifications(),
        vec![NotificationContent::session_complete(SessionType::Work)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_failing_sinks_do_not_stop_timer() {
    let f = create_fixture(create_fast_config());
    f.alert.set_should_fail(true);
    f.notifier.set_should_fail(true);

    complete_session(&f.engine).await;
    complete_session(&f.engine).await;

    assert_eq!(f.engine.state().current_session_type, SessionType::Work);
    assert_eq!(f.engine.state().completed_sessions, 1);
}

// ============================================================================
// Event Stream
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_event_stream_for_one_session() {
    let f = create_fixture(create_fast_config());
    let mut events = f.engine.subscribe();

    complete_session(&f.engine).await;
    let events = drain(&mut events);

    assert_eq!(
        events.first(),
        Some(&TimerEvent::Started {
            session_type: SessionType::Work,
            remaining: 60
        })
    );
    let ticks = events
        .iter()
        .filter(|e| matches!(e, TimerEvent::Tick { .. }))
        .count();
    assert_eq!(ticks, 60);
    assert_eq!(
        events.last(),
        Some(&TimerEvent::SessionCompleted {
            completed: SessionType::Work,
            next: SessionType::ShortBreak,
            completed_sessions: 1
        })
    );
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_serializes_for_front_ends() {
    let f = create_fixture(PomodoroConfig::default());
    f.engine.start();
    advance_secs(90).await;

    let json = serde_json::to_value(f.engine.snapshot()).unwrap();

    assert_eq!(json["formattedTime"], "23:30");
    assert_eq!(json["label"], "Sesión de Trabajo");
    assert_eq!(json["state"]["timeRemaining"], 1410);
    assert_eq!(json["config"]["workDuration"], 25);
}
