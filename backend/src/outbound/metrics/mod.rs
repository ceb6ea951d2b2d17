//! Outbound adapters for metrics exporting.
//!
//! Prometheus-backed implementations of the domain metrics ports, compiled
//! only with the `metrics` feature.

mod prometheus_disposals;

pub use prometheus_disposals::PrometheusDisposalMetrics;
