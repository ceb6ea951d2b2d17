//! Prometheus adapter for disposal and achievement counters.
//!
//! Counters are registered with a caller-provided registry, normally the one
//! served by `actix-web-prom` on `/metrics`.

use async_trait::async_trait;
use prometheus::{CounterVec, IntCounterVec, Opts, Registry};

use crate::domain::MaterialType;
use crate::domain::ports::{DisposalMetrics, DisposalMetricsError};

/// Prometheus-backed disposal metrics recorder.
///
/// # Metric Specification
///
/// - `descarte_disposals_total` (counter, label `material`)
/// - `descarte_disposal_points_total` (counter, label `material`):
///   points awarded for disposals, before achievement bonuses
/// - `descarte_achievements_unlocked_total` (counter, label `title`)
pub struct PrometheusDisposalMetrics {
    disposals_total: IntCounterVec,
    points_total: CounterVec,
    achievements_total: IntCounterVec,
}

impl PrometheusDisposalMetrics {
    /// Create and register the counters.
    ///
    /// # Errors
    ///
    /// Returns an error when a metric with the same name is already
    /// registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let disposals_total = IntCounterVec::new(
            Opts::new("descarte_disposals_total", "Disposals recorded by material"),
            &["material"],
        )?;
        let points_total = CounterVec::new(
            Opts::new(
                "descarte_disposal_points_total",
                "Points awarded for disposals by material",
            ),
            &["material"],
        )?;
        let achievements_total = IntCounterVec::new(
            Opts::new(
                "descarte_achievements_unlocked_total",
                "Achievement unlocks by title",
            ),
            &["title"],
        )?;
        registry.register(Box::new(disposals_total.clone()))?;
        registry.register(Box::new(points_total.clone()))?;
        registry.register(Box::new(achievements_total.clone()))?;
        Ok(Self {
            disposals_total,
            points_total,
            achievements_total,
        })
    }
}

#[async_trait]
impl DisposalMetrics for PrometheusDisposalMetrics {
    async fn record_disposal(
        &self,
        material: MaterialType,
        points: u32,
    ) -> Result<(), DisposalMetricsError> {
        let label = [material.as_str()];
        self.disposals_total.with_label_values(&label).inc();
        self.points_total
            .with_label_values(&label)
            .inc_by(f64::from(points));
        Ok(())
    }

    async fn record_achievement(&self, title: &str) -> Result<(), DisposalMetricsError> {
        self.achievements_total.with_label_values(&[title]).inc();
        Ok(())
    }
}
