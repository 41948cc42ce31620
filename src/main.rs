use std::sync::Arc;

use donation_shifts::config::{Config, LogFormat};
use donation_shifts::error::AppError;
use donation_shifts::identity::StaticIdentityResolver;
use donation_shifts::state::AppState;
use donation_shifts::store::memory::{InMemoryDonationStore, InMemoryVolunteerRegistry};
use donation_shifts::{api, seed};
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::from_env()?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false);
    match config.log_format {
        LogFormat::Compact => subscriber.compact().init(),
        LogFormat::Json => subscriber.json().init(),
    }

    let identity = match &config.identity_fixtures {
        Some(path) => StaticIdentityResolver::from_json_file(path)?,
        None => StaticIdentityResolver::new(),
    };
    if identity.is_empty() {
        tracing::warn!("no identity fixtures loaded; every sign-in will be rejected");
    }

    let shared_state = Arc::new(AppState::with_backends(
        Arc::new(InMemoryDonationStore::new()),
        Arc::new(InMemoryVolunteerRegistry::new()),
        Arc::new(identity),
        config.event_buffer_size,
    ));

    if config.seed_sample_data {
        seed::seed_sample_donations(&shared_state).await?;
    }

    let app = api::rest::router(shared_state.clone())
        .fallback_service(ServeDir::new(&config.static_dir));

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::Internal(format!("server error: {err}")))?;

    tracing::info!("http server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
