//! Desktop notification backend for Linux and Windows (notify-rust).

use std::thread;

use notify_rust::Notification;
use tracing::{debug, warn};

use super::content::NotificationContent;
use super::error::NotificationError;
use super::{NotificationSink, Permission};

/// Application name reported to the notification daemon.
const APP_NAME: &str = "pomodoro";

/// Notification sink backed by the desktop notification service.
///
/// These platforms have no per-application permission prompt, so the sink
/// always reports [`Permission::Granted`]. Delivery runs on a short-lived
/// worker thread because the D-Bus round trip blocks.
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopNotificationSink;

impl DesktopNotificationSink {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for DesktopNotificationSink {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn request_permission(&self, pending: Option<NotificationContent>) {
        if let Some(content) = pending {
            if let Err(e) = self.show(&content) {
                warn!("Failed to deliver notification: {}", e);
            }
        }
    }

    fn show(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        let content = content.clone();
        thread::Builder::new()
            .name("pomodoro-notify".to_string())
            .spawn(move || {
                match Notification::new()
                    .appname(APP_NAME)
                    .summary(&content.title)
                    .body(&content.body)
                    .show()
                {
                    Ok(_) => debug!("Notification delivered: {}", content.body),
                    Err(e) => warn!("Failed to deliver notification: {}", e),
                }
            })
            .map(|_| ())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}
