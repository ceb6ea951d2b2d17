//! Domain port surface for recording disposal and achievement counters.
//!
//! Keeps the scoring service independent of the metrics backend. The
//! Prometheus adapter lives behind the `metrics` feature; everything else
//! uses [`NoOpDisposalMetrics`].

use async_trait::async_trait;

use crate::domain::MaterialType;

use super::define_port_error;

define_port_error! {
    /// Errors exposed when recording disposal metrics.
    pub enum DisposalMetricsError {
        /// Metric exporter rejected the write.
        Export { message: String } => "disposal metrics exporter failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DisposalMetrics: Send + Sync {
    /// Count a recorded disposal and the points it earned.
    async fn record_disposal(
        &self,
        material: MaterialType,
        points: u32,
    ) -> Result<(), DisposalMetricsError>;

    /// Count an achievement unlock.
    async fn record_achievement(&self, title: &str) -> Result<(), DisposalMetricsError>;
}

/// No-op implementation for when metrics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpDisposalMetrics;

#[async_trait]
impl DisposalMetrics for NoOpDisposalMetrics {
    async fn record_disposal(
        &self,
        _material: MaterialType,
        _points: u32,
    ) -> Result<(), DisposalMetricsError> {
        Ok(())
    }

    async fn record_achievement(&self, _title: &str) -> Result<(), DisposalMetricsError> {
        Ok(())
    }
}
