//! Read-only projections behind the dashboard and profile views.

use serde::Serialize;

use crate::error::AppError;
use crate::models::donation::Donation;
use crate::models::volunteer::VolunteerRegistration;
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationSummary {
    #[serde(flatten)]
    pub donation: Donation,
    pub volunteer_count: usize,
}

impl From<Donation> for DonationSummary {
    fn from(donation: Donation) -> Self {
        Self {
            volunteer_count: donation.assigned_volunteers.len(),
            donation,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub drivers: Vec<VolunteerRegistration>,
    pub givers: Vec<DonationSummary>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub is_donor: bool,
    pub is_volunteer: bool,
    pub is_new_member: bool,
}

pub async fn dashboard(state: &AppState) -> Result<Dashboard, AppError> {
    let drivers = state.volunteers.list().await?;
    let givers = state
        .donations
        .list()
        .await?
        .into_iter()
        .map(DonationSummary::from)
        .collect();

    Ok(Dashboard { drivers, givers })
}

pub async fn donations_by_owner(state: &AppState, email: &str) -> Result<Vec<Donation>, AppError> {
    let email = validation::required_email("email", Some(email))?;

    Ok(state
        .donations
        .list()
        .await?
        .into_iter()
        .filter(|donation| donation.is_owned_by(&email))
        .collect())
}

/// The caller's general driver registration, as a zero- or one-element list.
pub async fn volunteer_registrations(
    state: &AppState,
    email: &str,
) -> Result<Vec<VolunteerRegistration>, AppError> {
    let email = validation::required_email("email", Some(email))?;
    Ok(state.volunteers.find_by_email(&email).await?.into_iter().collect())
}

pub async fn membership(state: &AppState, email: &str) -> Result<Membership, AppError> {
    let email = validation::required_email("email", Some(email))?;

    let donations = state.donations.list().await?;
    let is_donor = donations.iter().any(|donation| donation.is_owned_by(&email));
    let has_claims = donations
        .iter()
        .any(|donation| donation.is_assigned_to(&email));
    let is_registered = state.volunteers.find_by_email(&email).await?.is_some();
    let is_volunteer = has_claims || is_registered;

    Ok(Membership {
        is_donor,
        is_volunteer,
        is_new_member: !is_donor && !is_volunteer,
    })
}
