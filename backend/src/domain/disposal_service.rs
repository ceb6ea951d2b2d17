//! Disposal scoring pipeline.
//!
//! Runs, in order: validation and scoring, the atomic award (persist,
//! credit, evaluate achievements, credit bonuses), the global aggregate
//! refresh and notification emission. Only the first two steps can fail the
//! request; a failed refresh degrades to the stored aggregate and failed
//! metrics or notifications are logged and ignored.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::impact_service::ImpactService;
use crate::domain::ports::{
    DisposalCommand, DisposalMetrics, DisposalOutcome, DisposalRepository,
    DisposalRepositoryError, ImpactRepository, NoOpDisposalMetrics, NotificationEmitter,
    RecordDisposalRequest, RecordDisposalResponse,
};
use crate::domain::{
    AchievementPolicy, Disposal, DisposalValidationError, Error, NewlyUnlocked, Notification,
    NotificationPayload, score_disposal,
};

pub(crate) fn map_repository_error(error: DisposalRepositoryError) -> Error {
    match error {
        DisposalRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("disposal repository unavailable: {message}"))
        }
        DisposalRepositoryError::Query { message } => {
            Error::internal(format!("disposal repository error: {message}"))
        }
    }
}

fn map_validation_error(error: DisposalValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

/// Service implementing [`DisposalCommand`].
pub struct DisposalService<R, I> {
    disposal_repo: Arc<R>,
    impact: ImpactService<I>,
    emitter: Arc<dyn NotificationEmitter>,
    metrics: Arc<dyn DisposalMetrics>,
    clock: Arc<dyn Clock>,
    policy: AchievementPolicy,
}

impl<R, I> DisposalService<R, I> {
    /// Create a service using the standard achievement rules and no metrics.
    pub fn new(
        disposal_repo: Arc<R>,
        impact: ImpactService<I>,
        emitter: Arc<dyn NotificationEmitter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            disposal_repo,
            impact,
            emitter,
            metrics: Arc::new(NoOpDisposalMetrics),
            clock,
            policy: AchievementPolicy::standard(),
        }
    }

    /// Record counters through `metrics`.
    pub fn with_metrics(mut self, metrics: Arc<dyn DisposalMetrics>) -> Self {
        self.metrics = metrics;
        self
    }
}

impl<R, I> DisposalService<R, I>
where
    R: DisposalRepository,
    I: ImpactRepository,
{
    async fn record_metrics(&self, outcome: &DisposalOutcome) {
        if let Err(error) = self
            .metrics
            .record_disposal(outcome.disposal.material, outcome.disposal.points_awarded)
            .await
        {
            warn!(%error, "failed to record disposal metrics");
        }
        for achievement in &outcome.unlocked {
            if let Err(error) = self.metrics.record_achievement(&achievement.title).await {
                warn!(%error, title = %achievement.title, "failed to record achievement metrics");
            }
        }
    }

    async fn notify(&self, outcome: &DisposalOutcome, unlocked: &[NewlyUnlocked]) {
        let user_id = outcome.disposal.user_id;
        let mut notifications: Vec<Notification> = unlocked
            .iter()
            .map(|unlock| Notification::new(user_id, NotificationPayload::achievement(unlock)))
            .collect();
        let before = outcome.standing_before.level();
        let after = outcome.standing_after.level();
        if after > before {
            notifications.push(Notification::new(
                user_id,
                NotificationPayload::level_up(before, after),
            ));
        }

        for notification in &notifications {
            if let Err(error) = self.emitter.emit(notification).await {
                warn!(
                    %error,
                    user_id = %user_id,
                    kind = notification.kind.as_str(),
                    "notification emit failed"
                );
            }
        }
    }
}

/// Re-derive the rule for each stored unlock so notifications carry the
/// same title, bonus and icon as the policy.
fn newly_unlocked(policy: &AchievementPolicy, outcome: &DisposalOutcome) -> Vec<NewlyUnlocked> {
    outcome
        .unlocked
        .iter()
        .filter_map(|achievement| {
            policy
                .rules()
                .iter()
                .find(|rule| rule.title() == achievement.title)
                .map(|rule| NewlyUnlocked { rule: *rule })
        })
        .collect()
}

#[async_trait]
impl<R, I> DisposalCommand for DisposalService<R, I>
where
    R: DisposalRepository,
    I: ImpactRepository,
{
    async fn record_disposal(
        &self,
        request: RecordDisposalRequest,
    ) -> Result<RecordDisposalResponse, Error> {
        let scored = score_disposal(&request.material_type, request.weight_kg)
            .map_err(map_validation_error)?;
        let disposal = Disposal::record(request.user_id, scored, self.clock.utc());

        let outcome = self
            .disposal_repo
            .record(&disposal, &self.policy)
            .await
            .map_err(map_repository_error)?;
        info!(
            disposal_id = %outcome.disposal.id,
            user_id = %outcome.disposal.user_id,
            material = outcome.disposal.material.as_str(),
            points = outcome.disposal.points_awarded,
            unlocked = outcome.unlocked.len(),
            "disposal recorded"
        );

        self.record_metrics(&outcome).await;
        let refresh = self.impact.refresh().await;
        self.notify(&outcome, &newly_unlocked(&self.policy, &outcome))
            .await;

        let level = outcome.standing_after.level();
        Ok(RecordDisposalResponse {
            disposal_id: outcome.disposal.id,
            points_awarded: outcome.disposal.points_awarded,
            points_total: outcome.standing_after.points_total,
            level,
            level_changed: level > outcome.standing_before.level(),
            new_achievements: outcome.unlocked,
            aggregate: refresh.aggregate,
            aggregate_refreshed: refresh.refreshed,
        })
    }
}

#[cfg(test)]
#[path = "disposal_service_tests.rs"]
mod tests;
