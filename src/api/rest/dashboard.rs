use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Json;
use axum::Router;

use crate::api::rest::EmailQuery;
use crate::engine::queries::{self, Dashboard, Membership};
use crate::error::AppError;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/data", get(data))
        .route("/profile", get(profile))
}

async fn data(State(state): State<Arc<AppState>>) -> Result<Json<Dashboard>, AppError> {
    Ok(Json(queries::dashboard(&state).await?))
}

async fn profile(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Membership>, AppError> {
    let membership =
        queries::membership(&state, query.email.as_deref().unwrap_or_default()).await?;
    Ok(Json(membership))
}
