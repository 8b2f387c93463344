//! Facultrack Server — HTTP surface for the inspection review workflow.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use facultrack_db::{DbError, DbManager};
use facultrack_db::repository::SurrealInspectionRepository;
use facultrack_review::InspectionService;
use thiserror::Error;
use tracing::info;

pub use config::{ConfigError, ServerConfig};
pub use routes::router;
pub use state::AppState;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database connection failed: {0}")]
    Database(#[from] surrealdb::Error),

    #[error(transparent)]
    Migration(#[from] DbError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Connect to the store, apply migrations and serve until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let manager = DbManager::connect(&config.db).await?;
    facultrack_db::run_migrations(manager.client()).await?;

    let repo = SurrealInspectionRepository::new(manager.client().clone());
    let state = Arc::new(AppState {
        service: InspectionService::new(repo),
        auth: config.auth.clone(),
    });

    let listener = tokio::net::TcpListener::bind(&config.http.bind_addr).await?;
    info!(addr = %config.http.bind_addr, "Listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
