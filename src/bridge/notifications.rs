//! User-visible notifications raised by host replies.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Seconds a notification stays live once newer ones arrive.
pub const NOTIFICATION_TTL_SECS: i64 = 10;

/// Upper bound on live notifications; the oldest go first.
pub const MAX_NOTIFICATIONS: usize = 20;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Something was placed
    Success,
    /// The host reported a failure
    Error,
    /// Informational
    Info,
}

/// One notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Identifier used for dismissal
    pub id: Uuid,
    /// Severity
    pub level: NotificationLevel,
    /// Text shown to the user
    pub message: String,
    /// When it was raised
    pub created_at: DateTime<Utc>,
}

/// Ordered notification list, oldest first.
///
/// Every push drops notifications older than [`NOTIFICATION_TTL_SECS`]
/// relative to the new one and keeps at most [`MAX_NOTIFICATIONS`].
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    items: Vec<Notification>,
}

impl Notifications {
    /// Adds a notification stamped with the current time.
    pub fn push(&mut self, level: NotificationLevel, message: impl Into<String>) -> Uuid {
        self.push_at(level, message, Utc::now())
    }

    /// Adds a notification with an explicit timestamp.
    pub fn push_at(
        &mut self,
        level: NotificationLevel,
        message: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Uuid {
        self.expire(created_at, Duration::seconds(NOTIFICATION_TTL_SECS));
        if self.items.len() >= MAX_NOTIFICATIONS {
            let excess = self.items.len() + 1 - MAX_NOTIFICATIONS;
            self.items.drain(..excess);
        }

        let id = Uuid::new_v4();
        self.items.push(Notification {
            id,
            level,
            message: message.into(),
            created_at,
        });
        id
    }

    /// Removes a notification. Returns false when the id is unknown.
    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Drops notifications older than `ttl` at `now`; returns how many went.
    pub fn expire(&mut self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let before = self.items.len();
        self.items.retain(|item| now - item.created_at < ttl);
        before - self.items.len()
    }

    /// All notifications, oldest first.
    #[must_use]
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Most recent notification.
    #[must_use]
    pub fn latest(&self) -> Option<&Notification> {
        self.items.last()
    }

    /// Number of live notifications.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when there are none.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
