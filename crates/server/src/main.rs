use phonebot::{PhonebotConfig, TaskRouter};
use server::{AppState, routes};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, prelude::*};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Invalid log filter: {0}")]
    LogFilter(String),
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // Load environment variables from `.env` if present
    dotenv::dotenv().ok();

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_string = format!(
        "warn,server={level},phonebot={level},device_client={level}",
        level = log_level
    );
    let env_filter =
        EnvFilter::try_new(filter_string).map_err(|e| ServerError::LogFilter(e.to_string()))?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(env_filter))
        .init();

    let config = PhonebotConfig::from_env();
    let authorizer = config.authorizer();
    if authorizer.is_empty() {
        tracing::warn!("AUTHORIZED_IDS is empty - every request will be rejected");
    } else {
        tracing::info!("{} authorised identities loaded", authorizer.len());
    }
    if config.device_simulate {
        tracing::warn!("Device simulate mode is on - commands will not reach the phone");
    }
    tracing::info!("Completion service: {}", config.llama_url);

    let state = AppState::new(TaskRouter::from_config(&config));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    let addr = listener.local_addr()?;
    tracing::info!("Server running on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
