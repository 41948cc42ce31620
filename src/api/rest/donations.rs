use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::rest::{parse_id, require_body, EmailQuery, MessageResponse};
use crate::engine::{queries, registrations};
use crate::error::AppError;
use crate::models::donation::{Donation, DonationPatch, NewDonation};
use crate::state::AppState;
use crate::validation;

const MIN_FOOD_TYPE_LEN: usize = 3;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/donations/:id",
            get(get_donation).put(update_donation).delete(delete_donation),
        )
        .route("/my-donations", get(my_donations))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDonationRequest {
    pub org_name: Option<String>,
    pub contact_person: Option<String>,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub food_type: Option<String>,
    pub pickup_time: Option<String>,
    pub address: Option<String>,
    pub owner_email: Option<String>,
}

impl RegisterDonationRequest {
    pub fn validate(self) -> Result<NewDonation, AppError> {
        let owner_email = match self.owner_email.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                Some(validation::email("ownerEmail", Some(raw))?)
            }
            _ => None,
        };

        Ok(NewDonation {
            org_name: validation::required("orgName", self.org_name.as_deref())?,
            contact_person: validation::required("contactPerson", self.contact_person.as_deref())?,
            donor_email: validation::email("donorEmail", self.donor_email.as_deref())?,
            donor_phone: validation::phone("donorPhone", self.donor_phone.as_deref())?,
            food_type: validation::min_len(
                "foodType",
                self.food_type.as_deref(),
                MIN_FOOD_TYPE_LEN,
            )?,
            pickup_time: validation::required("pickupTime", self.pickup_time.as_deref())?,
            address: validation::optional(self.address.as_deref()).unwrap_or_default(),
            owner_email,
        })
    }
}

/// Partial edit; unknown keys such as `assignedVolunteers` are ignored.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDonationRequest {
    pub org_name: Option<String>,
    pub contact_person: Option<String>,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub food_type: Option<String>,
    pub pickup_time: Option<String>,
    pub address: Option<String>,
}

impl UpdateDonationRequest {
    pub fn validate(self) -> Result<DonationPatch, AppError> {
        Ok(DonationPatch {
            org_name: self
                .org_name
                .map(|v| validation::required("orgName", Some(v.as_str())))
                .transpose()?,
            contact_person: self
                .contact_person
                .map(|v| validation::required("contactPerson", Some(v.as_str())))
                .transpose()?,
            donor_email: self
                .donor_email
                .map(|v| validation::email("donorEmail", Some(v.as_str())))
                .transpose()?,
            donor_phone: self
                .donor_phone
                .map(|v| validation::phone("donorPhone", Some(v.as_str())))
                .transpose()?,
            food_type: self
                .food_type
                .map(|v| validation::min_len("foodType", Some(v.as_str()), MIN_FOOD_TYPE_LEN))
                .transpose()?,
            pickup_time: self
                .pickup_time
                .map(|v| validation::required("pickupTime", Some(v.as_str())))
                .transpose()?,
            address: self.address.map(|v| validation::sanitize(&v)),
        })
    }
}

#[derive(Serialize)]
pub struct RegisteredResponse {
    pub message: String,
    pub id: Uuid,
}

pub(crate) async fn register_donation(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<RegisterDonationRequest>>,
) -> Result<Json<RegisteredResponse>, AppError> {
    let donation = require_body(payload)?.validate()?;
    let donation = registrations::register_donation(&state, donation).await?;

    Ok(Json(RegisteredResponse {
        message: "donation registered".to_string(),
        id: donation.id,
    }))
}

async fn get_donation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Donation>, AppError> {
    let id = parse_id("id", &id)?;
    Ok(Json(state.donations.get(id).await?))
}

async fn update_donation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Option<Json<UpdateDonationRequest>>,
) -> Result<Json<Donation>, AppError> {
    let id = parse_id("id", &id)?;
    let patch = require_body(payload)?.validate()?;
    let donation = registrations::update_donation(&state, id, patch).await?;
    Ok(Json(donation))
}

async fn delete_donation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id("id", &id)?;
    registrations::delete_donation(&state, id).await?;
    Ok(MessageResponse::new("donation deleted"))
}

async fn my_donations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<Vec<Donation>>, AppError> {
    let donations =
        queries::donations_by_owner(&state, query.email.as_deref().unwrap_or_default()).await?;
    Ok(Json(donations))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterDonationRequest {
        RegisterDonationRequest {
            org_name: Some("Supermercado Fresko".to_string()),
            contact_person: Some("Ana Lopez".to_string()),
            donor_email: Some("Ana@Fresko.com".to_string()),
            donor_phone: Some("33 1122 3344".to_string()),
            food_type: Some("Lacteos y embutidos".to_string()),
            pickup_time: Some("Lunes, 9am".to_string()),
            address: None,
            owner_email: Some("   ".to_string()),
        }
    }

    #[test]
    fn registration_normalizes_fields() {
        let donation = request().validate().unwrap();
        assert_eq!(donation.donor_email, "ana@fresko.com");
        assert_eq!(donation.donor_phone, "3311223344");
        assert!(donation.address.is_empty());
        assert!(donation.owner_email.is_none());
    }

    #[test]
    fn registration_rejects_short_food_type() {
        let mut req = request();
        req.food_type = Some("Pa".to_string());
        assert!(matches!(req.validate(), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn patch_validates_only_present_fields() {
        let patch = UpdateDonationRequest {
            org_name: None,
            contact_person: None,
            donor_email: None,
            donor_phone: Some("3398765432".to_string()),
            food_type: None,
            pickup_time: None,
            address: Some(" Av. Vallarta ".to_string()),
        }
        .validate()
        .unwrap();

        assert_eq!(patch.donor_phone.as_deref(), Some("3398765432"));
        assert_eq!(patch.address.as_deref(), Some("Av. Vallarta"));
        assert!(patch.org_name.is_none());
    }

    #[test]
    fn patch_rejects_blank_required_field() {
        let result = UpdateDonationRequest {
            org_name: Some("  ".to_string()),
            contact_person: None,
            donor_email: None,
            donor_phone: None,
            food_type: None,
            pickup_time: None,
            address: None,
        }
        .validate();
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
