use std::sync::Arc;

use crate::{
    config::{Config, StoreBackend},
    error::{AppError, Result},
    store::{
        memory::{MemDirectory, MemSessionStore},
        postgres::{PgDirectory, PgSessionStore},
        Directory, SessionStore,
    },
};

/// The application's state: the configuration plus the injected store and
/// directory handles.
///
/// The handles are trait objects so the scheduling engine is written against
/// the atomicity contract, not a concrete backend; which implementation sits
/// behind them is decided once, here, at startup.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// The session store. Owns session records and their atomicity.
    pub store: Arc<dyn SessionStore>,
    /// Read-only marketplace directory lookups.
    pub directory: Arc<dyn Directory>,
}

impl AppState {
    /// Creates a new `AppState` for the configured backend.
    pub async fn new(config: &Config) -> Result<Self> {
        match config.store_backend {
            StoreBackend::Postgres => {
                let database_url = config
                    .database_url
                    .as_deref()
                    .ok_or_else(|| AppError::Internal("DATABASE_URL missing".to_string()))?;
                let pool = crate::db::create_pool(database_url)?;
                tracing::info!("✅ PostgreSQL pool initialized with deadpool-postgres");

                Ok(AppState {
                    config: config.clone(),
                    store: Arc::new(PgSessionStore::new(pool.clone())),
                    directory: Arc::new(PgDirectory::new(pool)),
                })
            }
            StoreBackend::Memory => {
                tracing::info!("✅ In-memory store initialized (non-persistent)");
                Ok(Self::with_memory(config.clone(), MemDirectory::new()))
            }
        }
    }

    /// Creates an `AppState` over the in-memory backend with a pre-seeded
    /// directory. Used by the memory backend at startup and by tests.
    pub fn with_memory(config: Config, directory: MemDirectory) -> Self {
        AppState {
            config,
            store: Arc::new(MemSessionStore::new(directory.clone())),
            directory: Arc::new(directory),
        }
    }
}
