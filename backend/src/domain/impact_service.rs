//! Global impact projection service.
//!
//! Recomputes the aggregate from source data and stores it. Failures are
//! surfaced as errors on the query port, but the scoring pipeline uses
//! [`ImpactService::refresh`], which never fails and falls back to the last
//! stored aggregate.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{ImpactQuery, ImpactRepository, ImpactRepositoryError};
use crate::domain::{AggregateImpactData, Error, ImpactProjection};

fn map_repository_error(error: ImpactRepositoryError) -> Error {
    match error {
        ImpactRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("impact repository unavailable: {message}"))
        }
        ImpactRepositoryError::Query { message } => {
            Error::internal(format!("impact repository error: {message}"))
        }
    }
}

/// Aggregate handed back by [`ImpactService::refresh`].
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateRefresh {
    pub aggregate: AggregateImpactData,
    /// `false` when recomputation failed and a fallback is returned.
    pub refreshed: bool,
}

/// Impact service implementing [`ImpactQuery`].
pub struct ImpactService<I> {
    impact_repo: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<I> Clone for ImpactService<I> {
    fn clone(&self) -> Self {
        Self {
            impact_repo: Arc::clone(&self.impact_repo),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<I> ImpactService<I> {
    pub fn new(impact_repo: Arc<I>, clock: Arc<dyn Clock>) -> Self {
        Self { impact_repo, clock }
    }
}

impl<I> ImpactService<I>
where
    I: ImpactRepository,
{
    async fn recompute_and_store(&self) -> Result<AggregateImpactData, ImpactRepositoryError> {
        let inputs = self.impact_repo.impact_inputs().await?;
        let aggregate = AggregateImpactData::recompute(&inputs, self.clock.utc());
        self.impact_repo.save_aggregate(&aggregate).await?;
        debug!(
            co2_reduction = aggregate.projection.co2_reduction,
            active_users = aggregate.projection.active_users,
            "global impact aggregate recomputed"
        );
        Ok(aggregate)
    }

    /// Recompute the aggregate, or fall back to the stored one.
    ///
    /// When nothing was ever stored the fallback is an empty projection.
    pub async fn refresh(&self) -> AggregateRefresh {
        let error = match self.recompute_and_store().await {
            Ok(aggregate) => {
                return AggregateRefresh {
                    aggregate,
                    refreshed: true,
                };
            }
            Err(error) => error,
        };
        warn!(%error, "aggregate impact recompute failed; serving stored aggregate");
        let stored = match self.impact_repo.load_aggregate().await {
            Ok(stored) => stored,
            Err(load_error) => {
                warn!(error = %load_error, "stored aggregate impact could not be loaded");
                None
            }
        };
        AggregateRefresh {
            aggregate: stored.unwrap_or_else(|| {
                AggregateImpactData::new(ImpactProjection::empty(), self.clock.utc())
            }),
            refreshed: false,
        }
    }
}

#[async_trait]
impl<I> ImpactQuery for ImpactService<I>
where
    I: ImpactRepository,
{
    async fn current(&self) -> Result<AggregateImpactData, Error> {
        let stored = self
            .impact_repo
            .load_aggregate()
            .await
            .map_err(map_repository_error)?;
        match stored {
            Some(aggregate) => Ok(aggregate),
            None => self.recompute().await,
        }
    }

    async fn recompute(&self) -> Result<AggregateImpactData, Error> {
        self.recompute_and_store()
            .await
            .map_err(map_repository_error)
    }
}
