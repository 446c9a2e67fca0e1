//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context};

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

/// Wizard sessions untouched for this long are dropped.
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(2 * 60 * 60);

/// Where calculations, responses and benchmarks are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            other => bail!("unknown ROICALC_STORE value {other:?} (expected memory or postgres)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub store: StoreBackend,
    /// Required when `store` is `Postgres`.
    pub database_url: Option<String>,
    pub session_idle: Duration,
}

impl AppConfig {
    /// Read `ROICALC_BIND`, `ROICALC_STORE`, `DATABASE_URL` and
    /// `ROICALC_SESSION_IDLE_SECS`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_raw = lookup("ROICALC_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .parse::<SocketAddr>()
            .with_context(|| format!("ROICALC_BIND is not a socket address: {bind_raw}"))?;

        let store = match lookup("ROICALC_STORE") {
            Some(raw) => raw.parse::<StoreBackend>()?,
            None => StoreBackend::default(),
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if store == StoreBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when ROICALC_STORE=postgres");
        }

        let session_idle = match lookup("ROICALC_SESSION_IDLE_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().with_context(|| {
                    format!("ROICALC_SESSION_IDLE_SECS is not a number of seconds: {raw}")
                })?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_SESSION_IDLE,
        };

        Ok(Self {
            bind,
            store,
            database_url,
            session_idle,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: StoreBackend::Memory,
            database_url: None,
            session_idle: DEFAULT_SESSION_IDLE,
        }
    }
}
