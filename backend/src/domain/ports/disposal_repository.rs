//! Port for disposal persistence and the user counters it moves.
//!
//! [`DisposalRepository::record`] is the atomic award: adapters must insert
//! the disposal, credit its points, evaluate achievements against the
//! resulting snapshot, insert the unlocks and credit their bonuses as one
//! unit of work. Either all of it is visible afterwards or none of it is.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{
    AchievementPolicy, Disposal, DisposalListLimit, MaterialType, UnlockedAchievement, UserId,
    UserStanding,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by disposal repository adapters.
    pub enum DisposalRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "disposal repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "disposal repository query failed: {message}",
    }
}

/// Result of recording one disposal.
#[derive(Debug, Clone, PartialEq)]
pub struct DisposalOutcome {
    pub disposal: Disposal,
    /// Counters before the disposal was applied.
    pub standing_before: UserStanding,
    /// Counters after the disposal points and every bonus were applied.
    pub standing_after: UserStanding,
    /// Achievements this disposal unlocked, in rule order.
    pub unlocked: Vec<UnlockedAchievement>,
}

impl DisposalOutcome {
    /// Bonus points granted by the unlocked achievements.
    pub fn bonus_points(&self) -> u32 {
        self.unlocked.iter().map(|achievement| achievement.points).sum()
    }
}

/// Port for recording disposals and reading a user's history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DisposalRepository: Send + Sync {
    /// Record `disposal` and apply `policy`, atomically.
    async fn record(
        &self,
        disposal: &Disposal,
        policy: &AchievementPolicy,
    ) -> Result<DisposalOutcome, DisposalRepositoryError>;

    /// Current counters for a user; users without a row have empty standing.
    async fn find_standing(&self, user_id: &UserId)
    -> Result<UserStanding, DisposalRepositoryError>;

    /// Number of disposals logged by a user.
    async fn disposal_count(&self, user_id: &UserId) -> Result<u64, DisposalRepositoryError>;

    /// Most recent disposals first.
    async fn list_disposals(
        &self,
        user_id: &UserId,
        limit: DisposalListLimit,
    ) -> Result<Vec<Disposal>, DisposalRepositoryError>;

    /// Achievements held by a user, oldest first.
    async fn list_achievements(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UnlockedAchievement>, DisposalRepositoryError>;

    /// Summed weight per material for a user's disposals.
    async fn material_totals_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<BTreeMap<MaterialType, f64>, DisposalRepositoryError>;
}

/// Fixture implementation for tests that do not exercise persistence.
///
/// Recording credits the disposal points to an empty standing and unlocks
/// nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureDisposalRepository;

#[async_trait]
impl DisposalRepository for FixtureDisposalRepository {
    async fn record(
        &self,
        disposal: &Disposal,
        _policy: &AchievementPolicy,
    ) -> Result<DisposalOutcome, DisposalRepositoryError> {
        let standing_before = UserStanding::empty(disposal.user_id);
        Ok(DisposalOutcome {
            disposal: disposal.clone(),
            standing_before,
            standing_after: standing_before.earn(disposal.points_awarded),
            unlocked: Vec::new(),
        })
    }

    async fn find_standing(
        &self,
        user_id: &UserId,
    ) -> Result<UserStanding, DisposalRepositoryError> {
        Ok(UserStanding::empty(*user_id))
    }

    async fn disposal_count(&self, _user_id: &UserId) -> Result<u64, DisposalRepositoryError> {
        Ok(0)
    }

    async fn list_disposals(
        &self,
        _user_id: &UserId,
        _limit: DisposalListLimit,
    ) -> Result<Vec<Disposal>, DisposalRepositoryError> {
        Ok(Vec::new())
    }

    async fn list_achievements(
        &self,
        _user_id: &UserId,
    ) -> Result<Vec<UnlockedAchievement>, DisposalRepositoryError> {
        Ok(Vec::new())
    }

    async fn material_totals_for_user(
        &self,
        _user_id: &UserId,
    ) -> Result<BTreeMap<MaterialType, f64>, DisposalRepositoryError> {
        Ok(BTreeMap::new())
    }
}
