//! Port for the global impact projection.
//!
//! Adapters read the projection inputs in one consistent snapshot and store
//! the singleton aggregate with last-writer-wins semantics.

use async_trait::async_trait;

use crate::domain::{AggregateImpactData, ImpactInputs};

use super::define_port_error;

define_port_error! {
    /// Errors raised by impact repository adapters.
    pub enum ImpactRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "impact repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "impact repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImpactRepository: Send + Sync {
    /// Weight per material, user count and points sum, read together.
    async fn impact_inputs(&self) -> Result<ImpactInputs, ImpactRepositoryError>;

    /// Upsert the singleton aggregate.
    async fn save_aggregate(
        &self,
        aggregate: &AggregateImpactData,
    ) -> Result<(), ImpactRepositoryError>;

    /// The stored aggregate, if one was ever saved.
    async fn load_aggregate(&self) -> Result<Option<AggregateImpactData>, ImpactRepositoryError>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureImpactRepository;

#[async_trait]
impl ImpactRepository for FixtureImpactRepository {
    async fn impact_inputs(&self) -> Result<ImpactInputs, ImpactRepositoryError> {
        Ok(ImpactInputs::default())
    }

    async fn save_aggregate(
        &self,
        _aggregate: &AggregateImpactData,
    ) -> Result<(), ImpactRepositoryError> {
        Ok(())
    }

    async fn load_aggregate(&self) -> Result<Option<AggregateImpactData>, ImpactRepositoryError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_has_no_stored_aggregate() {
        let repo = FixtureImpactRepository;
        assert!(repo.load_aggregate().await.expect("load").is_none());
        assert_eq!(
            repo.impact_inputs().await.expect("inputs"),
            ImpactInputs::default()
        );
    }
}
