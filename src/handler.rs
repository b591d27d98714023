use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::debug_handler;

use std::sync::Arc;

use crate::service::{EmailService, PingError};

use crate::dto::{PingResponse, SlashCommandRequest};

#[debug_handler]
pub async fn execute_command(
    State(service): State<Arc<EmailService>>,
    Form(payload): Form<SlashCommandRequest>,
) -> Response {
    if !service.verify_token(&payload.token) {
        tracing::warn!(
            "Rejected slash command from '{}' in channel '{}': token mismatch",
            payload.user_name,
            payload.channel_id
        );
        return (StatusCode::UNAUTHORIZED, "Invalid command token").into_response();
    }

    tracing::info!(
        "Received {} command from '{}'",
        payload.command,
        payload.user_name
    );

    let raw = format!("{} {}", payload.command, payload.text);
    let reply = service.on_invoke(&raw).await;
    (StatusCode::OK, Json(reply)).into_response()
}

#[debug_handler]
pub async fn ping(State(service): State<Arc<EmailService>>) -> Response {
    match service.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(PingResponse {
                message: "Connected successfully!".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("ADSMedia connectivity check failed: {e}");
            let status = match e {
                PingError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
                PingError::Dispatch(_) => StatusCode::BAD_GATEWAY,
            };
            (
                status,
                Json(PingResponse {
                    message: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[debug_handler]
pub async fn health_check() -> Response {
    (StatusCode::OK, "Hello from ADSMedia command service!").into_response()
}
