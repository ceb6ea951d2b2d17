//! Recycler identity, running totals and level progression.
//!
//! A user's standing is the pair of counters the scoring pipeline mutates:
//! `points_total`, the spendable balance, and `experience`, the lifetime sum
//! of everything ever earned. Levels derive from experience only.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Experience required to advance one level.
pub const EXPERIENCE_PER_LEVEL: u64 = 500;

/// Validation errors returned when parsing a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its hyphenated UUID form.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::UserId;
    ///
    /// let id = UserId::new("123e4567-e89b-12d3-a456-426614174000").unwrap();
    /// assert_eq!(id.to_string(), "123e4567-e89b-12d3-a456-426614174000");
    /// assert!(UserId::new(" 123e4567-e89b-12d3-a456-426614174000").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Level derived from lifetime experience.
///
/// Level 1 covers `0..500` experience, level 2 covers `500..1000`, and so on.
///
/// # Examples
/// ```
/// use backend::domain::Level;
///
/// assert_eq!(Level::from_experience(0).get(), 1);
/// assert_eq!(Level::from_experience(499).get(), 1);
/// assert_eq!(Level::from_experience(500).get(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Level(u32);

impl Level {
    pub fn from_experience(experience: u64) -> Self {
        let level = experience / EXPERIENCE_PER_LEVEL + 1;
        Self(u32::try_from(level).unwrap_or(u32::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Experience at which the next level starts.
    pub fn next_threshold(self) -> u64 {
        u64::from(self.0).saturating_mul(EXPERIENCE_PER_LEVEL)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Running counters for one user.
///
/// A user with no row yet has the [`UserStanding::empty`] standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStanding {
    pub user_id: UserId,
    pub points_total: i64,
    pub experience: u64,
}

impl UserStanding {
    /// Standing of a user who has never earned anything.
    pub fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            points_total: 0,
            experience: 0,
        }
    }

    pub fn level(&self) -> Level {
        Level::from_experience(self.experience)
    }

    /// Experience still missing before the next level is reached.
    pub fn experience_to_next_level(&self) -> u64 {
        self.level()
            .next_threshold()
            .saturating_sub(self.experience)
    }

    /// Standing after earning `points`, which count towards both counters.
    pub fn earn(self, points: u32) -> Self {
        Self {
            points_total: self.points_total.saturating_add(i64::from(points)),
            experience: self.experience.saturating_add(u64::from(points)),
            ..self
        }
    }
}

#[cfg(test)]
mod tests;
