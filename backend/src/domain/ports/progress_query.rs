//! Driving port for a user's own progress, history and impact.

use async_trait::async_trait;

use crate::domain::{Disposal, Error, UnlockedAchievement, UserId, UserImpactSummary, UserStanding};

/// Snapshot of a user's gamification state.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProgress {
    pub standing: UserStanding,
    pub disposal_count: u64,
    pub achievements: Vec<UnlockedAchievement>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressQuery: Send + Sync {
    async fn progress(&self, user_id: &UserId) -> Result<UserProgress, Error>;

    /// Newest disposals first; `limit` must be within `1..=100` when given.
    async fn disposals(&self, user_id: &UserId, limit: Option<u32>)
    -> Result<Vec<Disposal>, Error>;

    async fn impact(&self, user_id: &UserId) -> Result<UserImpactSummary, Error>;
}
