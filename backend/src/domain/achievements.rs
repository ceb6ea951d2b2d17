//! Achievement rules and their evaluation.
//!
//! Rules run in a fixed order after every disposal. Each rule is checked on
//! its own against a snapshot of the user and yields an unlock only when the
//! user does not hold that title yet. Unlocks are one-way.
//!
//! The points rule is a window test on the running total, not a crossing
//! test. A single disposal that moves a user from 90 to 250 points skips the
//! window and the achievement is never granted.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::UserId;

/// Icon attached to an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementIcon {
    Seedling,
    Trophy,
    HundredPoints,
}

impl AchievementIcon {
    /// Stable identifier for storage and non-UI consumers.
    pub fn identifier(self) -> &'static str {
        match self {
            Self::Seedling => "seedling",
            Self::Trophy => "trophy",
            Self::HundredPoints => "hundred_points",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Seedling => "🌱",
            Self::Trophy => "🏆",
            Self::HundredPoints => "💯",
        }
    }

    pub fn from_identifier(value: &str) -> Option<Self> {
        [Self::Seedling, Self::Trophy, Self::HundredPoints]
            .into_iter()
            .find(|icon| icon.identifier() == value)
    }
}

/// A single achievement rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AchievementRule {
    /// First disposal ever.
    FirstStep,
    /// Tenth disposal.
    Dedicated,
    /// Running total inside `100..200`.
    Centennial,
}

impl AchievementRule {
    pub fn title(self) -> &'static str {
        match self {
            Self::FirstStep => "Primeiro Passo",
            Self::Dedicated => "Dedicado",
            Self::Centennial => "Centenário",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::FirstStep => "Registrou o primeiro descarte",
            Self::Dedicated => "Registrou 10 descartes",
            Self::Centennial => "Alcançou 100 pontos",
        }
    }

    /// Bonus points granted once on unlock.
    pub fn bonus(self) -> u32 {
        match self {
            Self::FirstStep => 50,
            Self::Dedicated => 100,
            Self::Centennial => 75,
        }
    }

    pub fn icon(self) -> AchievementIcon {
        match self {
            Self::FirstStep => AchievementIcon::Seedling,
            Self::Dedicated => AchievementIcon::Trophy,
            Self::Centennial => AchievementIcon::HundredPoints,
        }
    }

    fn is_met(self, snapshot: &AchievementSnapshot) -> bool {
        match self {
            Self::FirstStep => snapshot.disposal_count == 1,
            Self::Dedicated => snapshot.disposal_count == 10,
            Self::Centennial => (100..200).contains(&snapshot.points_total),
        }
    }
}

/// State the evaluator inspects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementSnapshot {
    /// Disposals recorded for the user, including the one just logged.
    pub disposal_count: u64,
    /// Points total after the latest disposal, before any bonus from this
    /// evaluation.
    pub points_total: i64,
    /// Titles the user already holds.
    pub unlocked_titles: BTreeSet<String>,
}

impl AchievementSnapshot {
    /// Record `unlocks` as held, so a second evaluation yields nothing.
    pub fn with_unlocked(mut self, unlocks: &[NewlyUnlocked]) -> Self {
        self.unlocked_titles
            .extend(unlocks.iter().map(|unlock| unlock.title().to_owned()));
        self
    }
}

/// An achievement produced by one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewlyUnlocked {
    pub rule: AchievementRule,
}

impl NewlyUnlocked {
    pub fn title(&self) -> &'static str {
        self.rule.title()
    }

    pub fn description(&self) -> &'static str {
        self.rule.description()
    }

    pub fn points(&self) -> u32 {
        self.rule.bonus()
    }

    pub fn icon(&self) -> AchievementIcon {
        self.rule.icon()
    }
}

/// Ordered rule set applied after each disposal.
///
/// # Examples
/// ```
/// use backend::domain::{AchievementPolicy, AchievementSnapshot};
///
/// let snapshot = AchievementSnapshot {
///     disposal_count: 1,
///     points_total: 75,
///     ..AchievementSnapshot::default()
/// };
/// let unlocked = AchievementPolicy::standard().evaluate(&snapshot);
/// assert_eq!(unlocked.len(), 1);
/// assert_eq!(unlocked[0].title(), "Primeiro Passo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementPolicy {
    rules: Vec<AchievementRule>,
}

impl AchievementPolicy {
    pub fn standard() -> Self {
        Self {
            rules: vec![
                AchievementRule::FirstStep,
                AchievementRule::Dedicated,
                AchievementRule::Centennial,
            ],
        }
    }

    pub fn rules(&self) -> &[AchievementRule] {
        &self.rules
    }

    /// Rules met by `snapshot` whose titles are not yet held, in rule order.
    pub fn evaluate(&self, snapshot: &AchievementSnapshot) -> Vec<NewlyUnlocked> {
        self.rules
            .iter()
            .copied()
            .filter(|rule| !snapshot.unlocked_titles.contains(rule.title()))
            .filter(|rule| rule.is_met(snapshot))
            .map(|rule| NewlyUnlocked { rule })
            .collect()
    }
}

impl Default for AchievementPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// Achievement held by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockedAchievement {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub points: u32,
    pub icon: AchievementIcon,
    pub unlocked_at: DateTime<Utc>,
}

impl UnlockedAchievement {
    /// Materialise a fresh unlock for `user_id`.
    pub fn grant(user_id: UserId, unlock: NewlyUnlocked, unlocked_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: unlock.title().to_owned(),
            description: unlock.description().to_owned(),
            points: unlock.points(),
            icon: unlock.icon(),
            unlocked_at,
        }
    }
}
