use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::assignment::Assignment;
use crate::models::donation::Donation;
use crate::models::event::{ShiftEvent, ShiftEventKind};
use crate::observability::metrics::Metrics;
use crate::store::{AppendOutcome, DonationStore};
use crate::validation;

/// Claims and releases of donation pickup slots.
///
/// Per donation and volunteer the only states are unassigned and assigned:
/// a claim on an assigned volunteer is rejected, a release on an unassigned
/// one succeeds without changing anything.
#[derive(Clone)]
pub struct ShiftService {
    donations: Arc<dyn DonationStore>,
    events_tx: broadcast::Sender<ShiftEvent>,
    metrics: Metrics,
}

impl ShiftService {
    pub fn new(
        donations: Arc<dyn DonationStore>,
        events_tx: broadcast::Sender<ShiftEvent>,
        metrics: Metrics,
    ) -> Self {
        Self {
            donations,
            events_tx,
            metrics,
        }
    }

    #[instrument(skip_all, fields(donation_id = %donation_id))]
    pub async fn claim(
        &self,
        donation_id: Uuid,
        volunteer_email: &str,
        volunteer_name: &str,
    ) -> Result<Assignment, AppError> {
        let start = Instant::now();
        let result = self
            .try_claim(donation_id, volunteer_email, volunteer_name)
            .await;
        self.record("claim", &result, start);
        result
    }

    async fn try_claim(
        &self,
        donation_id: Uuid,
        volunteer_email: &str,
        volunteer_name: &str,
    ) -> Result<Assignment, AppError> {
        let email = validation::email("volunteerEmail", Some(volunteer_email))?;
        let name = validation::required("volunteerName", Some(volunteer_name))?;
        let assignment = Assignment::new(email, name);

        match self
            .donations
            .append_assignment_if_absent(donation_id, assignment.clone())
            .await?
        {
            AppendOutcome::Appended => {
                self.metrics.active_assignments.inc();
                let _ = self.events_tx.send(ShiftEvent::new(
                    ShiftEventKind::Claimed,
                    donation_id,
                    &assignment.email,
                ));
                info!(volunteer_email = %assignment.email, "shift claimed");
                Ok(assignment)
            }
            AppendOutcome::AlreadyPresent => {
                warn!(volunteer_email = %assignment.email, "duplicate shift claim rejected");
                Err(AppError::Conflict(
                    "volunteer is already assigned to this donation".to_string(),
                ))
            }
        }
    }

    /// Returns the number of entries removed; zero is still a success.
    #[instrument(skip_all, fields(donation_id = %donation_id))]
    pub async fn release(
        &self,
        donation_id: Uuid,
        volunteer_email: &str,
    ) -> Result<usize, AppError> {
        let start = Instant::now();
        let result = self.try_release(donation_id, volunteer_email).await;
        self.record("release", &result, start);
        result
    }

    async fn try_release(
        &self,
        donation_id: Uuid,
        volunteer_email: &str,
    ) -> Result<usize, AppError> {
        let email = validation::required_email("volunteerEmail", Some(volunteer_email))?;

        let removed = self
            .donations
            .remove_assignments_by_email(donation_id, &email)
            .await?;

        if removed > 0 {
            self.metrics.active_assignments.sub(removed as i64);
            let _ = self.events_tx.send(ShiftEvent::new(
                ShiftEventKind::Released,
                donation_id,
                &email,
            ));
            info!(volunteer_email = %email, removed, "shift released");
        } else {
            debug!(volunteer_email = %email, "release found no claim");
        }

        Ok(removed)
    }

    /// Donations holding a claim by this volunteer, in store order.
    pub async fn list_assigned_for_volunteer(
        &self,
        volunteer_email: &str,
    ) -> Result<Vec<Donation>, AppError> {
        let email = validation::required_email("email", Some(volunteer_email))?;

        Ok(self
            .donations
            .list()
            .await?
            .into_iter()
            .filter(|donation| donation.is_assigned_to(&email))
            .collect())
    }

    pub async fn list_assignments_for_donation(
        &self,
        donation_id: Uuid,
    ) -> Result<Vec<Assignment>, AppError> {
        Ok(self.donations.get(donation_id).await?.assigned_volunteers)
    }

    fn record<T>(&self, operation: &str, result: &Result<T, AppError>, start: Instant) {
        let outcome = match result {
            Ok(_) => "success",
            Err(err) => err.kind(),
        };
        self.metrics
            .record_shift_operation(operation, outcome, start.elapsed().as_secs_f64());
    }
}
