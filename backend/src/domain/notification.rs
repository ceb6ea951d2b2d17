//! Notifications raised by the scoring pipeline.

use serde::Serialize;

use crate::domain::{AchievementIcon, Level, NewlyUnlocked, UserId};

/// Kind of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Achievement,
    LevelUp,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Achievement => "ACHIEVEMENT",
            Self::LevelUp => "LEVEL_UP",
        }
    }
}

/// Payload carried by a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NotificationPayload {
    #[serde(rename_all = "camelCase")]
    Achievement {
        title: String,
        description: String,
        points: u32,
        icon: AchievementIcon,
    },
    #[serde(rename_all = "camelCase")]
    LevelUp { previous_level: Level, level: Level },
}

impl NotificationPayload {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::Achievement { .. } => NotificationKind::Achievement,
            Self::LevelUp { .. } => NotificationKind::LevelUp,
        }
    }

    pub fn achievement(unlock: &NewlyUnlocked) -> Self {
        Self::Achievement {
            title: unlock.title().to_owned(),
            description: unlock.description().to_owned(),
            points: unlock.points(),
            icon: unlock.icon(),
        }
    }

    pub fn level_up(previous_level: Level, level: Level) -> Self {
        Self::LevelUp {
            previous_level,
            level,
        }
    }
}

/// A notification addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub payload: NotificationPayload,
}

impl Notification {
    pub fn new(user_id: UserId, payload: NotificationPayload) -> Self {
        Self {
            user_id,
            kind: payload.kind(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AchievementRule;

    #[test]
    fn kind_follows_payload() {
        let user_id = UserId::random();
        let unlock = NewlyUnlocked {
            rule: AchievementRule::FirstStep,
        };
        let achievement = Notification::new(user_id, NotificationPayload::achievement(&unlock));
        assert_eq!(achievement.kind, NotificationKind::Achievement);

        let level_up = Notification::new(
            user_id,
            NotificationPayload::level_up(Level::from_experience(499), Level::from_experience(500)),
        );
        assert_eq!(level_up.kind.as_str(), "LEVEL_UP");
    }

    #[test]
    fn achievement_payload_serialises_icon_identifier() {
        let unlock = NewlyUnlocked {
            rule: AchievementRule::Centennial,
        };
        let value = serde_json::to_value(NotificationPayload::achievement(&unlock))
            .expect("serialise payload");
        assert_eq!(value["icon"], "hundred_points");
        assert_eq!(value["points"], 75);
    }
}
