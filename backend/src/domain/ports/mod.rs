//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod disposal_command;
mod disposal_metrics;
mod disposal_repository;
mod impact_query;
mod impact_repository;
mod login_service;
mod notification_emitter;
mod progress_query;

#[cfg(test)]
pub use disposal_command::MockDisposalCommand;
pub use disposal_command::{DisposalCommand, RecordDisposalRequest, RecordDisposalResponse};
#[cfg(test)]
pub use disposal_metrics::MockDisposalMetrics;
pub use disposal_metrics::{DisposalMetrics, DisposalMetricsError, NoOpDisposalMetrics};
#[cfg(test)]
pub use disposal_repository::MockDisposalRepository;
pub use disposal_repository::{
    DisposalOutcome, DisposalRepository, DisposalRepositoryError, FixtureDisposalRepository,
};
#[cfg(test)]
pub use impact_query::MockImpactQuery;
pub use impact_query::ImpactQuery;
#[cfg(test)]
pub use impact_repository::MockImpactRepository;
pub use impact_repository::{FixtureImpactRepository, ImpactRepository, ImpactRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{
    FIXTURE_PASSWORD, FIXTURE_USER_ID, FIXTURE_USERNAME, FixtureLoginService, LoginService,
};
#[cfg(test)]
pub use notification_emitter::MockNotificationEmitter;
pub use notification_emitter::{
    NoOpNotificationEmitter, NotificationEmitter, NotificationEmitterError,
};
#[cfg(test)]
pub use progress_query::MockProgressQuery;
pub use progress_query::{ProgressQuery, UserProgress};
