use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Deserialize;

use crate::api::rest::donations::RegisteredResponse;
use crate::api::rest::{require_body, EmailQuery};
use crate::engine::{queries, registrations};
use crate::error::AppError;
use crate::models::volunteer::{Availability, NewVolunteer, VolunteerRegistration};
use crate::state::AppState;
use crate::validation;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/my-volunteer-shifts", get(my_volunteer_shifts))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterVolunteerRequest {
    pub volunteer_name: Option<String>,
    pub volunteer_email: Option<String>,
    pub volunteer_phone: Option<String>,
    pub availability: Option<String>,
}

impl RegisterVolunteerRequest {
    pub fn validate(self) -> Result<NewVolunteer, AppError> {
        let availability = validation::required("availability", self.availability.as_deref())?
            .parse::<Availability>()
            .map_err(AppError::InvalidInput)?;

        Ok(NewVolunteer {
            volunteer_name: validation::required("volunteerName", self.volunteer_name.as_deref())?,
            volunteer_email: validation::email("volunteerEmail", self.volunteer_email.as_deref())?,
            volunteer_phone: validation::phone("volunteerPhone", self.volunteer_phone.as_deref())?,
            availability,
        })
    }
}

pub(crate) async fn register_volunteer(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<RegisterVolunteerRequest>>,
) -> Result<Json<RegisteredResponse>, AppError> {
    let volunteer = require_body(payload)?.validate()?;
    let registration = registrations::register_volunteer(&state, volunteer).await?;

    Ok(Json(RegisteredResponse {
        message: "volunteer registered".to_string(),
        id: registration.id,
    }))
}

async fn my_volunteer_shifts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<VolunteerRegistration>>, AppError> {
    let registrations =
        queries::volunteer_registrations(&state, query.email.as_deref().unwrap_or_default())
            .await?;
    Ok(Json(registrations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_availability_is_rejected() {
        let result = RegisterVolunteerRequest {
            volunteer_name: Some("Ana".to_string()),
            volunteer_email: Some("a@x.com".to_string()),
            volunteer_phone: Some("3311223344".to_string()),
            availability: Some("nights".to_string()),
        }
        .validate();
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
