//! Driving port for logging a disposal.
//!
//! One call runs the whole scoring pipeline: validation and scoring, the
//! atomic award, the aggregate refresh and notification emission.

use async_trait::async_trait;

use crate::domain::{
    AggregateImpactData, DisposalId, Error, Level, UnlockedAchievement, UserId,
};

/// Raw disposal request as received from a client.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDisposalRequest {
    pub user_id: UserId,
    pub material_type: String,
    pub weight_kg: f64,
}

/// Everything the client learns from logging a disposal.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDisposalResponse {
    pub disposal_id: DisposalId,
    pub points_awarded: u32,
    pub new_achievements: Vec<UnlockedAchievement>,
    pub points_total: i64,
    pub level: Level,
    pub level_changed: bool,
    pub aggregate: AggregateImpactData,
    /// `false` when the aggregate could not be recomputed and the previously
    /// stored one is returned instead.
    pub aggregate_refreshed: bool,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DisposalCommand: Send + Sync {
    /// Score, persist and evaluate one disposal.
    ///
    /// Validation failures are `invalid_request` errors whose details name
    /// the offending field; nothing is persisted in that case.
    async fn record_disposal(
        &self,
        request: RecordDisposalRequest,
    ) -> Result<RecordDisposalResponse, Error>;
}
