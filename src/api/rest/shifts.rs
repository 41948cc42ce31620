use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::api::rest::{lookup_id, parse_id, require_body, EmailQuery};
use crate::error::AppError;
use crate::models::assignment::Assignment;
use crate::models::donation::Donation;
use crate::state::AppState;
use crate::validation;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shifts/assign", post(assign_shift))
        .route("/shifts/unassign/:donation_id", delete(unassign_shift))
        .route("/my-assigned-shifts", get(my_assigned_shifts))
        .route("/donations/:id/assignments", get(donation_assignments))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignShiftRequest {
    pub donation_id: Option<String>,
    pub volunteer_email: Option<String>,
    pub volunteer_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnassignShiftRequest {
    pub volunteer_email: Option<String>,
}

#[derive(Serialize)]
pub struct AssignShiftResponse {
    pub message: String,
    pub assignment: Assignment,
}

#[derive(Serialize)]
pub struct UnassignShiftResponse {
    pub message: String,
    pub removed: usize,
}

async fn assign_shift(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<AssignShiftRequest>>,
) -> Result<Json<AssignShiftResponse>, AppError> {
    let payload = require_body(payload)?;
    let donation_id = parse_id(
        "donationId",
        payload.donation_id.as_deref().unwrap_or_default(),
    )?;

    let assignment = state
        .shifts
        .claim(
            donation_id,
            payload.volunteer_email.as_deref().unwrap_or_default(),
            payload.volunteer_name.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(Json(AssignShiftResponse {
        message: "shift assigned".to_string(),
        assignment,
    }))
}

async fn unassign_shift(
    State(state): State<Arc<AppState>>,
    Path(donation_id): Path<String>,
    payload: Option<Json<UnassignShiftRequest>>,
) -> Result<Json<UnassignShiftResponse>, AppError> {
    let payload = require_body(payload)?;
    let volunteer_email = payload.volunteer_email.as_deref().unwrap_or_default();

    // An id that cannot name a donation holds no claims to release.
    let removed = match lookup_id("donationId", &donation_id)? {
        Some(donation_id) => state.shifts.release(donation_id, volunteer_email).await?,
        None => {
            validation::required_email("volunteerEmail", Some(volunteer_email))?;
            0
        }
    };

    let message = if removed > 0 {
        "shift released"
    } else {
        "no shift to release"
    };

    Ok(Json(UnassignShiftResponse {
        message: message.to_string(),
        removed,
    }))
}

async fn my_assigned_shifts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Donation>>, AppError> {
    let donations = state
        .shifts
        .list_assigned_for_volunteer(query.email.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(donations))
}

async fn donation_assignments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Assignment>>, AppError> {
    let id = parse_id("id", &id)?;
    let assignments = state.shifts.list_assignments_for_donation(id).await?;
    Ok(Json(assignments))
}
