pub mod auth;
pub mod dashboard;
pub mod donations;
pub mod shifts;
pub mod volunteers;
pub mod ws;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(auth::router())
        .merge(dashboard::router())
        .merge(donations::router())
        .merge(shifts::router())
        .merge(volunteers::router());

    Router::new()
        .nest("/api", api)
        .route("/join/giver", post(donations::register_donation))
        .route("/join/driver", post(volunteers::register_volunteer))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/ws", get(ws::ws_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// A blank id is invalid input. Any other text that is not a UUID cannot
/// name a stored donation and resolves to `None`.
pub(crate) fn lookup_id(field: &str, raw: &str) -> Result<Option<Uuid>, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::InvalidInput(format!("{field} is required")));
    }
    Ok(Uuid::parse_str(raw).ok())
}

/// Like [`lookup_id`], with an unresolvable id reported as `NotFound`.
pub(crate) fn parse_id(field: &str, raw: &str) -> Result<Uuid, AppError> {
    lookup_id(field, raw)?
        .ok_or_else(|| AppError::NotFound(format!("donation {} not found", raw.trim())))
}

pub(crate) fn require_body<T>(payload: Option<Json<T>>) -> Result<T, AppError> {
    payload
        .map(|Json(inner)| inner)
        .ok_or_else(|| AppError::InvalidInput("request body must be a JSON object".to_string()))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    donations: usize,
    volunteers: usize,
    assignments: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, AppError> {
    let assignments = state
        .donations
        .list()
        .await?
        .iter()
        .map(|donation| donation.assigned_volunteers.len())
        .sum();

    Ok(Json(HealthResponse {
        status: "ok",
        donations: state.donations.len().await?,
        volunteers: state.volunteers.list().await?.len(),
        assignments,
    }))
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => AppError::Internal(err).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_id_is_invalid_input() {
        assert!(matches!(
            lookup_id("donationId", "  "),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn non_uuid_id_resolves_to_nothing() {
        assert_eq!(lookup_id("donationId", "abc").unwrap(), None);
        assert!(matches!(parse_id("id", "abc"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn uuid_id_resolves() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id("id", &format!(" {id} ")).unwrap(), id);
    }
}
