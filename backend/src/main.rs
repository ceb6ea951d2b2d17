//! Backend entry-point: loads settings, prepares storage and serves the REST
//! API.

mod server;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{BuildMode, SessionToggles, session_settings};
use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use backend::settings::ServerSettings;
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let key_file = settings.session_key_file();
    let session = session_settings(
        SessionToggles {
            key_file: &key_file,
            cookie_secure: settings.cookie_secure(),
            same_site: settings.session_same_site.as_deref(),
            allow_ephemeral: settings.session_allow_ephemeral(),
            allow_insecure_cookie: settings.session_allow_insecure(),
        },
        BuildMode::from_debug_assertions(),
    )
    .map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr(),
    );

    if let Some(pool) = prepare_database(&settings).await? {
        config = config.with_db_pool(pool);
    } else {
        info!("no database configured; disposals are kept in memory");
    }

    #[cfg(feature = "metrics")]
    {
        config = config.with_metrics(make_metrics());
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(addr = %settings.bind_addr(), "serving");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

async fn prepare_database(settings: &ServerSettings) -> std::io::Result<Option<DbPool>> {
    let Some(url) = settings.database_url.as_deref() else {
        return Ok(None);
    };
    if settings.run_migrations() {
        run_migrations(url)
            .await
            .map_err(|e| std::io::Error::other(format!("migrations failed: {e}")))?;
    }
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_size()))
        .await
        .map_err(|e| std::io::Error::other(format!("database pool failed: {e}")))?;
    Ok(Some(pool))
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Option<PrometheusMetrics> {
    match PrometheusMetricsBuilder::new("descarte")
        .endpoint("/metrics")
        .build()
    {
        Ok(metrics) => Some(metrics),
        Err(error) => {
            warn!(%error, "prometheus middleware disabled");
            None
        }
    }
}
