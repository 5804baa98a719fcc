//! Shared application state: connection pool and assist engine.

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::openai::OpenAiChatBackend;
use actix_web::web;
use log::info;
use notekeep_core::db::{configure_connection, open_db};
use notekeep_core::{AssistConfig, AssistEngine, ModelBackend};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;

pub type DbPool = Pool<SqliteConnectionManager>;

pub struct AppState {
    pub pool: DbPool,
    pub assist: AssistEngine,
}

impl AppState {
    pub fn new(pool: DbPool, assist: AssistEngine) -> Self {
        Self { pool, assist }
    }

    /// Opens the database, applies migrations and wires the assist engine.
    pub fn from_config(config: &ServerConfig) -> Result<Self, String> {
        let pool = build_pool(&config.database_path)?;

        let backend: Option<Arc<dyn ModelBackend>> = if config.ai.model_ready() {
            OpenAiChatBackend::from_settings(&config.ai)
                .map(|backend| Arc::new(backend) as Arc<dyn ModelBackend>)
        } else {
            None
        };
        let assist = AssistEngine::new(
            AssistConfig {
                model_enabled: config.ai.enabled,
                model_timeout: config.ai.timeout,
            },
            backend,
        );
        info!(
            "event=assist_init module=server status=ok model_active={}",
            assist.model_active()
        );

        Ok(Self::new(pool, assist))
    }

    /// Runs `work` with a pooled connection on the blocking thread pool.
    pub async fn with_conn<T, F>(&self, work: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        web::block(move || {
            let conn = pool.get()?;
            work(&conn)
        })
        .await?
    }
}

/// Migrates the database file once, then builds a pool whose connections
/// all run with the core connection settings.
pub fn build_pool(path: &Path) -> Result<DbPool, String> {
    open_db(path).map_err(|err| format!("failed to open database `{}`: {err}", path.display()))?;

    let manager = SqliteConnectionManager::file(path).with_init(|conn| configure_connection(conn));
    Pool::builder()
        .build(manager)
        .map_err(|err| format!("failed to build connection pool: {err}"))
}
