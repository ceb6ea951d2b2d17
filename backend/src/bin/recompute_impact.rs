//! Recompute the global impact aggregate from the disposal log and store it.
//!
//! Prints the stored aggregate as JSON. Useful after restoring a backup or
//! when the aggregate row was lost.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Write};
use std::sync::Arc;

use backend::domain::ImpactService;
use backend::domain::ports::ImpactQuery;
use backend::inbound::http::dto::AggregateImpactBody;
use backend::outbound::persistence::{DbPool, DieselImpactRepository, PoolConfig, run_migrations};
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;

/// `recompute-impact` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "recompute-impact",
    about = "Rebuild the global recycling impact aggregate from recorded disposals",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Apply pending migrations first.
    #[arg(long)]
    migrate: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let database_url = resolve_database_url(args.database_url, env::var("DATABASE_URL").ok())?;
    if args.migrate {
        run_migrations(&database_url)
            .await
            .wrap_err("failed to apply migrations")?;
    }
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(1))
        .await
        .wrap_err("failed to create database pool")?;

    let service = ImpactService::new(
        Arc::new(DieselImpactRepository::new(pool)),
        Arc::new(DefaultClock),
    );
    let aggregate = service
        .recompute()
        .await
        .map_err(|error| eyre!("recompute failed: {error}"))?;

    let json = serde_json::to_string_pretty(&AggregateImpactBody::from(aggregate))
        .wrap_err("failed to serialise aggregate")?;
    writeln!(io::stdout().lock(), "{json}").wrap_err("failed to write aggregate")?;
    Ok(())
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(eyre!("--database-url must not be empty when provided"));
        }
        return Ok(value);
    }
    match from_env {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) => Err(eyre!("DATABASE_URL must not be empty")),
        None => Err(eyre!(
            "database URL missing: set --database-url or DATABASE_URL"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("postgres://cli"), Some("postgres://env"), Some("postgres://cli"))]
    #[case(None, Some("postgres://env"), Some("postgres://env"))]
    #[case(Some("  "), Some("postgres://env"), None)]
    #[case(None, Some(""), None)]
    #[case(None, None, None)]
    fn database_url_prefers_the_flag(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let resolved = resolve_database_url(
            explicit.map(str::to_owned),
            from_env.map(str::to_owned),
        );
        assert_eq!(resolved.ok().as_deref(), expected);
    }

    #[rstest]
    fn parses_migrate_flag() {
        let args = CliArgs::try_parse_from(["recompute-impact", "--migrate"]).expect("args parse");
        assert!(args.migrate);
        assert!(args.database_url.is_none());
    }
}
