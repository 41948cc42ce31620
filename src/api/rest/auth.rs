use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::rest::require_body;
use crate::error::AppError;
use crate::identity::Identity;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/auth/google", post(login))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub token: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: Identity,
}

async fn login(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<LoginRequest>>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = require_body(payload)?.token.unwrap_or_default();
    if token.trim().is_empty() {
        return Err(AppError::InvalidInput("token is required".to_string()));
    }

    match state.identity.resolve(token.trim()).await {
        Ok(user) => {
            info!(email = %user.email, "user signed in");
            Ok(Json(LoginResponse { user }))
        }
        Err(err) => {
            warn!(error = %err, "sign-in rejected");
            Err(err)
        }
    }
}
