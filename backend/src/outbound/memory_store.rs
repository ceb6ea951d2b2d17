//! In-process store implementing both repository ports.
//!
//! Backs the server when no database URL is configured and drives the
//! behaviour tests. A single async mutex guards all state, so `record` is as
//! atomic here as the Diesel transaction is in PostgreSQL: concurrent
//! disposals for the same user are evaluated one after another.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{
    DisposalOutcome, DisposalRepository, DisposalRepositoryError, ImpactRepository,
    ImpactRepositoryError,
};
use crate::domain::{
    AchievementPolicy, AchievementSnapshot, AggregateImpactData, Disposal, DisposalListLimit,
    ImpactInputs, MaterialType, UnlockedAchievement, UserId, UserStanding,
};

#[derive(Debug, Default)]
struct StoreState {
    standings: HashMap<UserId, UserStanding>,
    disposals: Vec<Disposal>,
    achievements: Vec<UnlockedAchievement>,
    aggregate: Option<AggregateImpactData>,
}

impl StoreState {
    fn standing(&self, user_id: &UserId) -> UserStanding {
        self.standings
            .get(user_id)
            .copied()
            .unwrap_or_else(|| UserStanding::empty(*user_id))
    }

    fn disposals_of<'a>(&'a self, user_id: &'a UserId) -> impl Iterator<Item = &'a Disposal> {
        self.disposals
            .iter()
            .filter(move |disposal| disposal.user_id == *user_id)
    }

    fn holds(&self, user_id: &UserId, title: &str) -> bool {
        self.achievements
            .iter()
            .any(|held| held.user_id == *user_id && held.title == title)
    }
}

/// Mutex-guarded in-memory implementation of the storage ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DisposalRepository for InMemoryStore {
    async fn record(
        &self,
        disposal: &Disposal,
        policy: &AchievementPolicy,
    ) -> Result<DisposalOutcome, DisposalRepositoryError> {
        let mut state = self.state.lock().await;
        let user_id = disposal.user_id;
        let standing_before = state.standing(&user_id);
        let after_disposal = standing_before.earn(disposal.points_awarded);
        state.disposals.push(disposal.clone());

        let snapshot = AchievementSnapshot {
            disposal_count: state.disposals_of(&user_id).count() as u64,
            points_total: after_disposal.points_total,
            unlocked_titles: state
                .achievements
                .iter()
                .filter(|held| held.user_id == user_id)
                .map(|held| held.title.clone())
                .collect(),
        };

        let mut unlocked = Vec::new();
        for unlock in policy.evaluate(&snapshot) {
            if state.holds(&user_id, unlock.title()) {
                continue;
            }
            let achievement = UnlockedAchievement::grant(user_id, unlock, disposal.created_at);
            state.achievements.push(achievement.clone());
            unlocked.push(achievement);
        }

        let standing_after = unlocked
            .iter()
            .fold(after_disposal, |standing, achievement| {
                standing.earn(achievement.points)
            });
        state.standings.insert(user_id, standing_after);

        Ok(DisposalOutcome {
            disposal: disposal.clone(),
            standing_before,
            standing_after,
            unlocked,
        })
    }

    async fn find_standing(
        &self,
        user_id: &UserId,
    ) -> Result<UserStanding, DisposalRepositoryError> {
        Ok(self.state.lock().await.standing(user_id))
    }

    async fn disposal_count(&self, user_id: &UserId) -> Result<u64, DisposalRepositoryError> {
        Ok(self.state.lock().await.disposals_of(user_id).count() as u64)
    }

    async fn list_disposals(
        &self,
        user_id: &UserId,
        limit: DisposalListLimit,
    ) -> Result<Vec<Disposal>, DisposalRepositoryError> {
        let state = self.state.lock().await;
        let mut listed: Vec<Disposal> = state.disposals_of(user_id).cloned().collect();
        // Insertion order breaks timestamp ties, newest first.
        listed.reverse();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listed.truncate(limit.get() as usize);
        Ok(listed)
    }

    async fn list_achievements(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UnlockedAchievement>, DisposalRepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .achievements
            .iter()
            .filter(|held| held.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn material_totals_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<BTreeMap<MaterialType, f64>, DisposalRepositoryError> {
        let state = self.state.lock().await;
        let mut totals = BTreeMap::new();
        for disposal in state.disposals_of(user_id) {
            *totals.entry(disposal.material).or_insert(0.0) += disposal.weight.kg();
        }
        Ok(totals)
    }
}

#[async_trait]
impl ImpactRepository for InMemoryStore {
    async fn impact_inputs(&self) -> Result<ImpactInputs, ImpactRepositoryError> {
        let state = self.state.lock().await;
        let mut weight_by_material = BTreeMap::new();
        for disposal in &state.disposals {
            *weight_by_material.entry(disposal.material).or_insert(0.0) += disposal.weight.kg();
        }
        Ok(ImpactInputs {
            weight_by_material,
            active_users: state.standings.len() as u64,
            total_points: state
                .standings
                .values()
                .map(|standing| standing.points_total)
                .sum(),
        })
    }

    async fn save_aggregate(
        &self,
        aggregate: &AggregateImpactData,
    ) -> Result<(), ImpactRepositoryError> {
        self.state.lock().await.aggregate = Some(aggregate.clone());
        Ok(())
    }

    async fn load_aggregate(&self) -> Result<Option<AggregateImpactData>, ImpactRepositoryError> {
        Ok(self.state.lock().await.aggregate.clone())
    }
}
