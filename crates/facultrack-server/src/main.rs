//! Facultrack Server — Application entry point.

use std::process::ExitCode;

use facultrack_server::ServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("facultrack=info")),
        )
        .json()
        .init();

    tracing::info!("Starting Facultrack server...");

    let result = match ServerConfig::load_with_dotenv() {
        Ok(config) => facultrack_server::run(config).await,
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(()) => {
            tracing::info!("Facultrack server stopped.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "Facultrack server failed");
            ExitCode::FAILURE
        }
    }
}
