//! Driving port for the global impact aggregate.

use async_trait::async_trait;

use crate::domain::{AggregateImpactData, Error};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImpactQuery: Send + Sync {
    /// The stored aggregate, computed and stored first when none exists.
    async fn current(&self) -> Result<AggregateImpactData, Error>;

    /// Recompute from source data, store and return the result.
    async fn recompute(&self) -> Result<AggregateImpactData, Error>;
}
