use std::env;
use std::net::SocketAddr;

use anyhow::{Context, Result};

/// Which session store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL via deadpool. The production backend.
    Postgres,
    /// In-process HashMaps. Local development and tests.
    Memory,
}

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The store backend to run against.
    pub store_backend: StoreBackend,
    /// The URL of the PostgreSQL database. Required for the Postgres backend.
    pub database_url: Option<String>,
    /// The socket address the server binds to.
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    pub fn from_env() -> Result<Self> {
        let store_backend = match env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .as_str()
        {
            "postgres" => StoreBackend::Postgres,
            "memory" => StoreBackend::Memory,
            other => anyhow::bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{}'", other),
        };

        let database_url = match store_backend {
            StoreBackend::Postgres => Some(
                env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            ),
            StoreBackend::Memory => env::var("DATABASE_URL").ok(),
        };

        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .context("Invalid BIND_ADDR")?;

        Ok(Self {
            store_backend,
            database_url,
            bind_addr,
        })
    }
}
