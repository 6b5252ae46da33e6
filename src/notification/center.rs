//! UNUserNotificationCenter backend (macOS).
//!
//! Completion handlers arrive on arbitrary threads and are bridged to async
//! code through oneshot channels. Objective-C objects never cross an
//! `.await`, so the futures stay `Send` and can run on the tokio runtime.

use std::cell::RefCell;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use block2::RcBlock;
use objc2::rc::Retained;
use objc2::runtime::Bool;
use objc2_foundation::{NSError, NSString};
use objc2_user_notifications::{
    UNAuthorizationOptions, UNAuthorizationStatus, UNMutableNotificationContent,
    UNNotificationRequest, UNNotificationSettings, UNNotificationSound,
    UNUserNotificationCenter,
};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::content::NotificationContent;
use super::error::NotificationError;
use super::{NotificationSink, Permission};

pub struct NotificationCenter;

impl NotificationCenter {
    #[must_use]
    pub fn current() -> Retained<UNUserNotificationCenter> {
        UNUserNotificationCenter::currentNotificationCenter()
    }

    pub async fn request_authorization() -> Result<bool, NotificationError> {
        let rx = {
            let (tx, rx) = oneshot::channel::<Result<bool, NotificationError>>();

            let options = UNAuthorizationOptions::Alert
                | UNAuthorizationOptions::Sound
                | UNAuthorizationOptions::Badge;

            let cb = RefCell::new(Some(tx));
            let block = RcBlock::new(move |granted: Bool, error: *mut NSError| {
                if let Some(sender) = cb.borrow_mut().take() {
                    let result = match unsafe { error.as_ref() } {
                        Some(err) => Err(NotificationError::AuthorizationFailed(
                            err.localizedDescription().to_string(),
                        )),
                        None => Ok(granted.as_bool()),
                    };
                    let _ = sender.send(result);
                }
            });

            Self::current().requestAuthorizationWithOptions_completionHandler(options, &block);
            rx
        };

        rx.await
            .map_err(|_| NotificationError::InitializationFailed("Channel closed".to_string()))?
    }

    pub async fn get_authorization_status() -> Result<UNAuthorizationStatus, NotificationError> {
        let rx = {
            let (tx, rx) = oneshot::channel::<UNAuthorizationStatus>();

            let cb = RefCell::new(Some(tx));
            let block = RcBlock::new(move |settings: NonNull<UNNotificationSettings>| {
                if let Some(sender) = cb.borrow_mut().take() {
                    let status = unsafe { settings.as_ref().authorizationStatus() };
                    let _ = sender.send(status);
                }
            });

            Self::current().getNotificationSettingsWithCompletionHandler(&block);
            rx
        };

        rx.await
            .map_err(|_| NotificationError::InitializationFailed("Channel closed".to_string()))
    }

    /// Posts `content` immediately. The tag doubles as the request
    /// identifier, so a newer notification replaces the previous one.
    pub async fn deliver(content: &NotificationContent) -> Result<(), NotificationError> {
        let rx = {
            let (tx, rx) = oneshot::channel::<Result<(), NotificationError>>();

            let native = native_content(content);
            let identifier = NSString::from_str(&content.tag);
            let request =
                UNNotificationRequest::requestWithIdentifier_content_trigger(&identifier, &native, None);

            let cb = RefCell::new(Some(tx));
            let block = RcBlock::new(move |error: *mut NSError| {
                if let Some(sender) = cb.borrow_mut().take() {
                    let result = match unsafe { error.as_ref() } {
                        Some(err) => Err(NotificationError::SendFailed(
                            err.localizedDescription().to_string(),
                        )),
                        None => Ok(()),
                    };
                    let _ = sender.send(result);
                }
            });

            Self::current().addNotificationRequest_withCompletionHandler(&request, Some(&block));
            rx
        };

        rx.await
            .map_err(|_| NotificationError::SendFailed("Channel closed".to_string()))?
    }
}

fn native_content(content: &NotificationContent) -> Retained<UNMutableNotificationContent> {
    let native = unsafe { UNMutableNotificationContent::new() };
    unsafe {
        native.setTitle(&NSString::from_str(&content.title));
        native.setBody(&NSString::from_str(&content.body));
        native.setThreadIdentifier(&NSString::from_str(&content.tag));
        native.setSound(Some(&UNNotificationSound::defaultSound()));
    }
    native
}

fn permission_from_status(status: UNAuthorizationStatus) -> Permission {
    if matches!(
        status,
        UNAuthorizationStatus::Authorized
            | UNAuthorizationStatus::Provisional
            | UNAuthorizationStatus::Ephemeral
    ) {
        Permission::Granted
    } else if status == UNAuthorizationStatus::Denied {
        Permission::Denied
    } else {
        Permission::Undetermined
    }
}

fn needs_authorization(status: UNAuthorizationStatus) -> bool {
    permission_from_status(status) == Permission::Undetermined
}

/// Requests authorization, records the answer and shows `pending` once
/// granted.
async fn authorize(permission: Arc<AtomicU8>, pending: Option<NotificationContent>) {
    match NotificationCenter::request_authorization().await {
        Ok(granted) => {
            let current = if granted {
                Permission::Granted
            } else {
                Permission::Denied
            };
            permission.store(current as u8, Ordering::SeqCst);

            if let (true, Some(content)) = (granted, pending) {
                if let Err(e) = NotificationCenter::deliver(&content).await {
                    warn!("Failed to deliver notification: {}", e);
                }
            }
        }
        Err(e) => warn!("Notification authorization failed: {}", e),
    }
}

/// Notification sink backed by the macOS notification center.
///
/// The authorization status is only available asynchronously, so the sink
/// caches it and refreshes it in the background.
pub struct MacNotificationSink {
    permission: Arc<AtomicU8>,
    runtime: Handle,
}

impl MacNotificationSink {
    /// Creates the sink and starts reading the current authorization status.
    ///
    /// # Errors
    ///
    /// Returns `NotificationError::InitializationFailed` when called outside
    /// a tokio runtime.
    pub fn new() -> Result<Self, NotificationError> {
        let runtime = Handle::try_current()
            .map_err(|e| NotificationError::InitializationFailed(e.to_string()))?;

        let sink = Self {
            permission: Arc::new(AtomicU8::new(Permission::Undetermined as u8)),
            runtime,
        };
        sink.refresh_permission();
        Ok(sink)
    }

    fn refresh_permission(&self) {
        let permission = Arc::clone(&self.permission);
        self.runtime.spawn(async move {
            match NotificationCenter::get_authorization_status().await {
                Ok(status) => {
                    let current = permission_from_status(status);
                    debug!("Notification permission: {:?}", current);
                    permission.store(current as u8, Ordering::SeqCst);
                }
                Err(e) => warn!("Could not read notification settings: {}", e),
            }
        });
    }
}

impl NotificationSink for MacNotificationSink {
    fn permission(&self) -> Permission {
        Permission::from_u8(self.permission.load(Ordering::SeqCst))
    }

    fn request_permission(&self, pending: Option<NotificationContent>) {
        let permission = Arc::clone(&self.permission);
        self.runtime.spawn(authorize(permission, pending));
    }

    /// Reads the live authorization status before asking, since the cached
    /// value is still `Undetermined` until the startup refresh lands.
    fn ensure_permission(&self) {
        let permission = Arc::clone(&self.permission);
        self.runtime.spawn(async move {
            let status = match NotificationCenter::get_authorization_status().await {
                Ok(status) => status,
                Err(e) => {
                    warn!("Could not read notification settings: {}", e);
                    return;
                }
            };

            let current = permission_from_status(status);
            permission.store(current as u8, Ordering::SeqCst);
            if needs_authorization(status) {
                debug!("Requesting notification permission");
                authorize(permission, None).await;
            } else {
                debug!("Notification permission already {:?}", current);
            }
        });
    }

    fn show(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        let content = content.clone();
        self.runtime.spawn(async move {
            if let Err(e) = NotificationCenter::deliver(&content).await {
                warn!("Failed to deliver notification: {}", e);
            }
        });
        Ok(())
    }
}
