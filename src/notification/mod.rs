//! System notifications for session transitions.
//!
//! This module provides the notification side effect fired when a
//! countdown reaches zero. It includes:
//!
//! - A permission model (`Permission`) and the narrow `NotificationSink`
//!   capability the timer depends on
//! - The dispatch rule: show when granted, ask when undetermined, skip when
//!   denied
//! - Platform adapters: the macOS notification center, and desktop
//!   notifications elsewhere
//!
//! # Example
//!
//! ```rust,no_run
//! use pomodoro::notification::{default_sink, dispatch, NotificationContent};
//! use pomodoro::types::SessionType;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let sink = default_sink();
//! dispatch(sink.as_ref(), NotificationContent::session_complete(SessionType::Work));
//! # }
//! ```

mod content;
pub mod error;

#[cfg(target_os = "macos")]
mod center;
#[cfg(not(target_os = "macos"))]
mod desktop;

use std::sync::Arc;

use tracing::{debug, warn};

pub use self::content::{NotificationContent, NOTIFICATION_TAG, NOTIFICATION_TITLE};
pub use self::error::NotificationError;

#[cfg(target_os = "macos")]
pub use self::center::MacNotificationSink;
#[cfg(not(target_os = "macos"))]
pub use self::desktop::DesktopNotificationSink;

/// Whether the user allows this program to post notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Permission {
    /// Notifications may be shown.
    Granted = 0,
    /// The user refused; notifications are skipped silently.
    Denied = 1,
    /// Not asked yet.
    Undetermined = 2,
}

impl Permission {
    /// Decodes the value stored by `Permission as u8`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => Permission::Granted,
            1 => Permission::Denied,
            _ => Permission::Undetermined,
        }
    }
}

/// Capability to post desktop notifications.
///
/// Every method must return promptly; slow platform work happens in the
/// background.
pub trait NotificationSink: Send + Sync {
    /// Current permission as last known to the sink.
    fn permission(&self) -> Permission;

    /// Asks the user for permission without waiting for the answer.
    ///
    /// If `pending` is set it is shown once permission is granted.
    fn request_permission(&self, pending: Option<NotificationContent>);

    /// Asks for permission only if it has not been decided yet.
    ///
    /// Sinks whose cached permission can lag behind the platform override
    /// this to check the live status first.
    fn ensure_permission(&self) {
        match self.permission() {
            Permission::Undetermined => {
                debug!("Requesting notification permission");
                self.request_permission(None);
            }
            permission => debug!("Notification permission already {:?}", permission),
        }
    }

    /// Posts a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the notification could not be handed to the
    /// platform.
    fn show(&self, content: &NotificationContent) -> Result<(), NotificationError>;
}

/// Posts `content` according to the sink's permission.
///
/// Granted shows it, undetermined requests permission and shows it once
/// granted, denied drops it. Failures are logged and never propagated.
pub fn dispatch(sink: &dyn NotificationSink, content: NotificationContent) {
    match sink.permission() {
        Permission::Granted => {
            if let Err(e) = sink.show(&content) {
                warn!("Notification failed: {} ({})", e, e.suggestion());
            }
        }
        Permission::Undetermined => {
            debug!("Notification permission undetermined, requesting");
            sink.request_permission(Some(content));
        }
        Permission::Denied => {
            debug!("Notification permission denied, skipping");
        }
    }
}

/// Notification sink used when notifications are disabled or unsupported.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotificationSink;

impl NotificationSink for SilentNotificationSink {
    fn permission(&self) -> Permission {
        Permission::Denied
    }

    fn request_permission(&self, _pending: Option<NotificationContent>) {}

    fn show(&self, _content: &NotificationContent) -> Result<(), NotificationError> {
        Err(NotificationError::NotAvailable)
    }
}

/// Creates the notification sink for the current platform.
///
/// Falls back to [`SilentNotificationSink`] if the platform backend cannot
/// start; the failure is logged as a warning.
#[must_use]
pub fn default_sink() -> Arc<dyn NotificationSink> {
    #[cfg(target_os = "macos")]
    {
        match MacNotificationSink::new() {
            Ok(sink) => Arc::new(sink),
            Err(e) => {
                warn!("Notifications unavailable: {}", e);
                Arc::new(SilentNotificationSink)
            }
        }
    }

    #[cfg(not(target_os = "macos"))]
    {
        Arc::new(DesktopNotificationSink::new())
    }
}

/// Mock notification sink for testing.
#[derive(Debug)]
pub struct MockNotificationSink {
    shown: std::sync::Mutex<Vec<NotificationContent>>,
    permission: std::sync::atomic::AtomicU8,
    permission_requests: std::sync::atomic::AtomicUsize,
    grant_on_request: std::sync::atomic::AtomicBool,
    should_fail: std::sync::atomic::AtomicBool,
}

impl Default for MockNotificationSink {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotificationSink {
    /// Creates a mock with permission already granted.
    #[must_use]
    pub fn new() -> Self {
        Self::with_permission(Permission::Granted)
    }

    #[must_use]
    pub fn with_permission(permission: Permission) -> Self {
        Self {
            shown: std::sync::Mutex::new(Vec::new()),
            permission: std::sync::atomic::AtomicU8::new(permission as u8),
            permission_requests: std::sync::atomic::AtomicUsize::new(0),
            grant_on_request: std::sync::atomic::AtomicBool::new(false),
            should_fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    pub fn set_permission(&self, permission: Permission) {
        self.permission
            .store(permission as u8, std::sync::atomic::Ordering::SeqCst);
    }

    /// Makes the next permission request succeed immediately.
    pub fn set_grant_on_request(&self, grant: bool) {
        self.grant_on_request
            .store(grant, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn get_notifications(&self) -> Vec<NotificationContent> {
        self.shown.lock().unwrap().clone()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.shown.lock().unwrap().len()
    }

    #[must_use]
    pub fn permission_request_count(&self) -> usize {
        self.permission_requests
            .load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl NotificationSink for MockNotificationSink {
    fn permission(&self) -> Permission {
        Permission::from_u8(self.permission.load(std::sync::atomic::Ordering::SeqCst))
    }

    fn request_permission(&self, pending: Option<NotificationContent>) {
        self.permission_requests
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        if self.grant_on_request.load(std::sync::atomic::Ordering::SeqCst) {
            self.set_permission(Permission::Granted);
            if let Some(content) = pending {
                self.shown.lock().unwrap().push(content);
            }
        }
    }

    fn show(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.shown.lock().unwrap().push(content.clone());
        Ok(())
    }
}
