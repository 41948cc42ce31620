use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::donation::{Donation, DonationPatch, NewDonation};
use crate::models::volunteer::{NewVolunteer, VolunteerRegistration};
use crate::state::AppState;

pub async fn register_donation(
    state: &AppState,
    donation: NewDonation,
) -> Result<Donation, AppError> {
    let donation = state.donations.create(donation).await?;
    state.metrics.donations_registered.inc();

    info!(
        donation_id = %donation.id,
        org_name = %donation.org_name,
        "donation registered"
    );
    Ok(donation)
}

pub async fn update_donation(
    state: &AppState,
    id: Uuid,
    patch: DonationPatch,
) -> Result<Donation, AppError> {
    let donation = state.donations.update(id, patch).await?;
    info!(donation_id = %id, "donation updated");
    Ok(donation)
}

/// Deleting a donation drops every claim on it.
pub async fn delete_donation(state: &AppState, id: Uuid) -> Result<Donation, AppError> {
    let donation = state.donations.delete(id).await?;
    state.metrics.donations_registered.dec();
    state
        .metrics
        .active_assignments
        .sub(donation.assigned_volunteers.len() as i64);

    info!(
        donation_id = %id,
        released = donation.assigned_volunteers.len(),
        "donation deleted"
    );
    Ok(donation)
}

pub async fn register_volunteer(
    state: &AppState,
    volunteer: NewVolunteer,
) -> Result<VolunteerRegistration, AppError> {
    match state.volunteers.register(volunteer).await {
        Ok(registration) => {
            state.metrics.volunteers_registered.inc();
            info!(volunteer_id = %registration.id, "volunteer registered");
            Ok(registration)
        }
        Err(err) => {
            warn!(error = %err, "volunteer registration rejected");
            Err(err)
        }
    }
}
