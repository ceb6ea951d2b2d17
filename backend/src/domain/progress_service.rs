//! Read-side service for a user's own progress.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::disposal_service::map_repository_error;
use crate::domain::ports::{DisposalRepository, ProgressQuery, UserProgress};
use crate::domain::{Disposal, DisposalListLimit, Error, UserId, UserImpactSummary};

/// Service implementing [`ProgressQuery`].
pub struct ProgressService<R> {
    disposal_repo: Arc<R>,
}

impl<R> Clone for ProgressService<R> {
    fn clone(&self) -> Self {
        Self {
            disposal_repo: Arc::clone(&self.disposal_repo),
        }
    }
}

impl<R> ProgressService<R> {
    pub fn new(disposal_repo: Arc<R>) -> Self {
        Self { disposal_repo }
    }
}

#[async_trait]
impl<R> ProgressQuery for ProgressService<R>
where
    R: DisposalRepository,
{
    async fn progress(&self, user_id: &UserId) -> Result<UserProgress, Error> {
        let standing = self
            .disposal_repo
            .find_standing(user_id)
            .await
            .map_err(map_repository_error)?;
        let disposal_count = self
            .disposal_repo
            .disposal_count(user_id)
            .await
            .map_err(map_repository_error)?;
        let achievements = self
            .disposal_repo
            .list_achievements(user_id)
            .await
            .map_err(map_repository_error)?;
        Ok(UserProgress {
            standing,
            disposal_count,
            achievements,
        })
    }

    async fn disposals(
        &self,
        user_id: &UserId,
        limit: Option<u32>,
    ) -> Result<Vec<Disposal>, Error> {
        let limit = DisposalListLimit::new(limit).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "limit", "code": "limit_out_of_range" }))
        })?;
        self.disposal_repo
            .list_disposals(user_id, limit)
            .await
            .map_err(map_repository_error)
    }

    async fn impact(&self, user_id: &UserId) -> Result<UserImpactSummary, Error> {
        let weights = self
            .disposal_repo
            .material_totals_for_user(user_id)
            .await
            .map_err(map_repository_error)?;
        Ok(UserImpactSummary::from_weights(&weights))
    }
}
