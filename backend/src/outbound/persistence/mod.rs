//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the disposal and impact repository ports,
//! backed by PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories translate between Diesel rows and
//!   domain types. Scoring and achievement rules stay in the domain; the
//!   disposal repository only applies the policy it is handed inside its
//!   transaction.
//! - **Internal models**: row structs (`models.rs`) and the table
//!   definitions (`schema.rs`) never leave this module.
//! - **Uniform errors**: pool and Diesel failures map to the port's
//!   connection or query variants.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselDisposalRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/descarte")).await?;
//! let repo = DieselDisposalRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_disposal_repository;
mod diesel_impact_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_disposal_repository::DieselDisposalRepository;
pub use diesel_impact_repository::DieselImpactRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
