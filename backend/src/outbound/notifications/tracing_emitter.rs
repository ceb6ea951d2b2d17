//! Emitter that publishes notifications as `tracing` events.

use async_trait::async_trait;
use tracing::info;

use crate::domain::Notification;
use crate::domain::ports::{NotificationEmitter, NotificationEmitterError};

/// Log target for notification events.
pub const NOTIFICATION_TARGET: &str = "descarte::notifications";

/// Writes every notification to the `descarte::notifications` target.
///
/// The payload is serialised to JSON so the event carries the same body a
/// push channel would receive.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationEmitter;

impl TracingNotificationEmitter {
    fn render(notification: &Notification) -> Result<String, NotificationEmitterError> {
        serde_json::to_string(&notification.payload)
            .map_err(|err| NotificationEmitterError::delivery(err.to_string()))
    }
}

#[async_trait]
impl NotificationEmitter for TracingNotificationEmitter {
    async fn emit(&self, notification: &Notification) -> Result<(), NotificationEmitterError> {
        let payload = Self::render(notification)?;
        info!(
            target: NOTIFICATION_TARGET,
            user_id = %notification.user_id,
            kind = notification.kind.as_str(),
            payload = %payload,
            "notification emitted"
        );
        Ok(())
    }
}
