//! Outbound port for user notifications.
//!
//! Emission is fire-and-forget from the scoring pipeline's point of view:
//! callers log failures and carry on.

use async_trait::async_trait;

use crate::domain::Notification;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when handing a notification to its channel.
    pub enum NotificationEmitterError {
        /// The delivery channel rejected or dropped the notification.
        Delivery { message: String } => "notification delivery failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationEmitter: Send + Sync {
    async fn emit(&self, notification: &Notification) -> Result<(), NotificationEmitterError>;
}

/// Emitter that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpNotificationEmitter;

#[async_trait]
impl NotificationEmitter for NoOpNotificationEmitter {
    async fn emit(&self, _notification: &Notification) -> Result<(), NotificationEmitterError> {
        Ok(())
    }
}
