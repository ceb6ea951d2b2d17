//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`).

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::Notification;
use crate::domain::ports::{NotificationEmitter, NotificationEmitterError};

/// Fixed instant used by fixtures: 2026-03-01T09:00:00Z.
pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MutableClock {
    fn default() -> Self {
        Self::new(fixture_timestamp())
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Emitter that keeps every notification it receives, or fails on demand.
#[derive(Default)]
pub struct RecordingNotificationEmitter {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotificationEmitter {
    /// An emitter whose every call fails.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Notifications received so far, oldest first.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl NotificationEmitter for RecordingNotificationEmitter {
    async fn emit(&self, notification: &Notification) -> Result<(), NotificationEmitterError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
        if self.fail {
            return Err(NotificationEmitterError::delivery("recording emitter set to fail"));
        }
        Ok(())
    }
}
