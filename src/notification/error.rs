//! Notification system error types.
//!
//! These errors stay inside the notification layer: `dispatch` logs them
//! and the timer never sees them.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Failed to request notification authorization from the system.
    #[error("no se pudo obtener el permiso de notificación: {0}")]
    AuthorizationFailed(String),

    /// Failed to send a notification.
    #[error("no se pudo enviar la notificación: {0}")]
    SendFailed(String),

    /// Failed to initialize the notification system.
    #[error("no se pudo inicializar el sistema de notificaciones: {0}")]
    InitializationFailed(String),

    /// The notification center is not available.
    #[error("el centro de notificaciones no está disponible")]
    NotAvailable,
}

impl NotificationError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthorizationFailed(_) => {
                "habilite las notificaciones en la configuración del sistema"
            }
            Self::SendFailed(_) => "inténtelo de nuevo más tarde",
            Self::InitializationFailed(_) | Self::NotAvailable => {
                "use --no-notify para desactivar las notificaciones"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NotificationError::SendFailed("timeout".to_string());
        assert!(err.to_string().contains("timeout"));

        let err = NotificationError::AuthorizationFailed("denied".to_string());
        assert!(err.to_string().contains("permiso"));
    }

    #[test]
    fn test_suggestion() {
        assert!(NotificationError::NotAvailable
            .suggestion()
            .contains("--no-notify"));
        assert!(NotificationError::AuthorizationFailed("x".into())
            .suggestion()
            .contains("configuración"));
    }
}
