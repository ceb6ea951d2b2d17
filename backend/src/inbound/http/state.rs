//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be exercised with fixtures or mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{DisposalCommand, ImpactQuery, LoginService, ProgressQuery};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use backend::domain::ports::{
///     FixtureDisposalRepository, FixtureImpactRepository, FixtureLoginService,
///     NoOpNotificationEmitter,
/// };
/// use backend::domain::{DisposalService, ImpactService, ProgressService};
/// use backend::inbound::http::state::HttpState;
/// use mockable::DefaultClock;
///
/// let clock: Arc<dyn mockable::Clock> = Arc::new(DefaultClock);
/// let impact = ImpactService::new(Arc::new(FixtureImpactRepository), clock.clone());
/// let disposals = Arc::new(FixtureDisposalRepository);
/// let state = HttpState {
///     login: Arc::new(FixtureLoginService),
///     disposals: Arc::new(DisposalService::new(
///         disposals.clone(),
///         impact.clone(),
///         Arc::new(NoOpNotificationEmitter),
///         clock,
///     )),
///     progress: Arc::new(ProgressService::new(disposals)),
///     impact: Arc::new(impact),
/// };
/// let _login = state.login.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub disposals: Arc<dyn DisposalCommand>,
    pub progress: Arc<dyn ProgressQuery>,
    pub impact: Arc<dyn ImpactQuery>,
}
