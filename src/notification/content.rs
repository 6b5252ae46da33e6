//! Notification content construction.

use serde::{Deserialize, Serialize};

use crate::types::SessionType;

/// Title shared by every notification the timer sends.
pub const NOTIFICATION_TITLE: &str = "Temporizador Pomodoro";

/// Tag grouping timer notifications; a newer one replaces the older.
pub const NOTIFICATION_TAG: &str = "pomodoro-notification";

/// Platform-neutral notification payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub tag: String,
}

impl NotificationContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tag: NOTIFICATION_TAG.to_string(),
        }
    }

    /// Content announcing that a session of `completed` type has finished.
    #[must_use]
    pub fn session_complete(completed: SessionType) -> Self {
        Self::new(
            NOTIFICATION_TITLE,
            format!("¡{} completada!", completed.label()),
        )
    }
}
