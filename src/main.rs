mod client;
mod command;
mod config;
mod dto;
mod handler;
mod reply;
mod service;
#[cfg(test)]
mod testing;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use std::sync::Arc;

use config::ConfigurationHolder;
use service::EmailService;

pub fn router(service: Arc<EmailService>) -> Router {
    Router::new()
        .route("/command", post(handler::execute_command))
        .route("/ping", get(handler::ping))
        .route("/", get(handler::health_check))
        .with_state(service)
        .layer(TraceLayer::new_for_http())
}

/// Re-reads the config source on SIGHUP and swaps in the new credentials.
#[cfg(unix)]
fn spawn_reload_on_sighup(holder: Arc<ConfigurationHolder>) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangups = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!("Failed to install SIGHUP handler, config reload disabled: {e}");
            return;
        }
    };

    tokio::spawn(async move {
        while hangups.recv().await.is_some() {
            match config::reload(&holder, config::load_config).await {
                Ok(()) => tracing::info!("Reloaded ADSMedia credentials"),
                Err(e) => {
                    tracing::error!("Config reload failed, keeping previous settings: {e}");
                }
            }
        }
    });
}

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt().init();

    // Load config
    let cfg = config::load_config().expect("failed to locate or load config file");
    tracing::info!("Successfully loaded ADSMedia command service config");
    if cfg.api_key.is_empty() {
        tracing::warn!("No ADSMedia API key configured, /email will reply with an error");
    }

    // Setup service
    let holder = Arc::new(ConfigurationHolder::new(cfg.configuration()));
    let service =
        EmailService::new(&cfg, holder.clone()).expect("Failed to create HTTP client");
    let service_ptr = Arc::new(service);

    #[cfg(unix)]
    spawn_reload_on_sighup(holder);

    tracing::info!(
        "Register the slash command with trigger '{}' ({}), hint '{}', pointing at POST /command",
        command::TRIGGER,
        command::AUTOCOMPLETE_DESC,
        command::AUTOCOMPLETE_HINT
    );

    // Setup router
    let app = router(service_ptr);

    // Start server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", cfg.port))
        .await
        .expect("Failed to bind to address");
    let addr = listener
        .local_addr()
        .expect("Failed to read listener address");

    tracing::info!("ADSMedia command service starting, listening on {}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
