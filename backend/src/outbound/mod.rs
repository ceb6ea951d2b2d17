//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory_store**: in-process repositories for database-less runs
//! - **notifications**: notification delivery as structured log events
//! - **metrics**: Prometheus counters (feature-gated)
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory_store;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod notifications;
pub mod persistence;
