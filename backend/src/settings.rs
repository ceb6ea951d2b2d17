//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `DESCARTE_*` environment variables and
//! configuration files, in that order of precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_POOL_SIZE: u32 = 10;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DESCARTE")]
pub struct ServerSettings {
    /// Address to bind. Defaults to all interfaces.
    pub host: Option<IpAddr>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without one the server keeps state in memory.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_size: Option<u32>,
    /// Apply embedded migrations before serving. Defaults to `true`.
    pub run_migrations: Option<bool>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// `SameSite` policy for the session cookie: `Strict`, `Lax` or `None`.
    pub session_same_site: Option<String>,
    /// Allow a generated session key when the key file is unreadable.
    pub session_allow_ephemeral: Option<bool>,
    /// Mark the session cookie `Secure`. Defaults to `true`.
    pub cookie_secure: Option<bool>,
    /// Accept `cookie_secure = false` in release builds.
    pub session_allow_insecure: Option<bool>,
}

impl ServerSettings {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    pub fn pool_size(&self) -> u32 {
        self.pool_size.unwrap_or(DEFAULT_POOL_SIZE)
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }

    pub fn session_allow_insecure(&self) -> bool {
        self.session_allow_insecure.unwrap_or(false)
    }

    pub fn session_key_file(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE))
    }
}
