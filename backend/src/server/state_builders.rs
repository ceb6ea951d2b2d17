//! Builders for the HTTP state ports.
//!
//! With a database pool the services run on the Diesel repositories;
//! otherwise every port shares one in-memory store.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::ports::{
    DisposalMetrics, DisposalRepository, FixtureLoginService, ImpactRepository,
    NoOpDisposalMetrics, NotificationEmitter,
};
use backend::domain::{DisposalService, ImpactService, ProgressService};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory_store::InMemoryStore;
use backend::outbound::notifications::TracingNotificationEmitter;
use backend::outbound::persistence::{DieselDisposalRepository, DieselImpactRepository};

use super::ServerConfig;

/// Collaborators shared by every storage backend.
struct ServiceDeps {
    emitter: Arc<dyn NotificationEmitter>,
    metrics: Arc<dyn DisposalMetrics>,
    clock: Arc<dyn Clock>,
}

fn build_state_with<R, I>(
    disposal_repo: Arc<R>,
    impact_repo: Arc<I>,
    deps: ServiceDeps,
) -> HttpState
where
    R: DisposalRepository + 'static,
    I: ImpactRepository + 'static,
{
    let ServiceDeps {
        emitter,
        metrics,
        clock,
    } = deps;
    let impact = ImpactService::new(impact_repo, clock.clone());
    let disposals =
        DisposalService::new(disposal_repo.clone(), impact.clone(), emitter, clock)
            .with_metrics(metrics);
    HttpState {
        login: Arc::new(FixtureLoginService),
        disposals: Arc::new(disposals),
        progress: Arc::new(ProgressService::new(disposal_repo)),
        impact: Arc::new(impact),
    }
}

#[cfg(feature = "metrics")]
fn build_disposal_metrics(config: &ServerConfig) -> std::io::Result<Arc<dyn DisposalMetrics>> {
    use backend::outbound::metrics::PrometheusDisposalMetrics;

    match &config.prometheus {
        Some(prom) => {
            let metrics = PrometheusDisposalMetrics::new(&prom.registry).map_err(|e| {
                std::io::Error::other(format!("disposal metrics registration failed: {e}"))
            })?;
            Ok(Arc::new(metrics))
        }
        None => Ok(Arc::new(NoOpDisposalMetrics)),
    }
}

#[cfg(not(feature = "metrics"))]
fn build_disposal_metrics(_config: &ServerConfig) -> std::io::Result<Arc<dyn DisposalMetrics>> {
    Ok(Arc::new(NoOpDisposalMetrics))
}

/// Build the shared HTTP state for `config`.
///
/// # Errors
/// Returns [`std::io::Error`] if Prometheus metric registration fails.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let deps = ServiceDeps {
        emitter: Arc::new(TracingNotificationEmitter),
        metrics: build_disposal_metrics(config)?,
        clock: Arc::new(DefaultClock),
    };
    let state = match &config.db_pool {
        Some(pool) => build_state_with(
            Arc::new(DieselDisposalRepository::new(pool.clone())),
            Arc::new(DieselImpactRepository::new(pool.clone())),
            deps,
        ),
        None => {
            let store = Arc::new(InMemoryStore::new());
            build_state_with(store.clone(), store, deps)
        }
    };
    Ok(web::Data::new(state))
}
