use std::sync::Arc;

use tokio::sync::broadcast;

use crate::engine::shifts::ShiftService;
use crate::identity::{IdentityResolver, StaticIdentityResolver};
use crate::models::event::ShiftEvent;
use crate::observability::metrics::Metrics;
use crate::store::memory::{InMemoryDonationStore, InMemoryVolunteerRegistry};
use crate::store::{DonationStore, VolunteerRegistry};

pub struct AppState {
    pub donations: Arc<dyn DonationStore>,
    pub volunteers: Arc<dyn VolunteerRegistry>,
    pub identity: Arc<dyn IdentityResolver>,
    pub shifts: ShiftService,
    pub shift_events_tx: broadcast::Sender<ShiftEvent>,
    pub metrics: Metrics,
}

impl AppState {
    /// In-memory stores and an empty credential table.
    pub fn new(event_buffer_size: usize) -> Self {
        Self::with_backends(
            Arc::new(InMemoryDonationStore::new()),
            Arc::new(InMemoryVolunteerRegistry::new()),
            Arc::new(StaticIdentityResolver::new()),
            event_buffer_size,
        )
    }

    pub fn with_backends(
        donations: Arc<dyn DonationStore>,
        volunteers: Arc<dyn VolunteerRegistry>,
        identity: Arc<dyn IdentityResolver>,
        event_buffer_size: usize,
    ) -> Self {
        let (shift_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);
        let metrics = Metrics::new();
        let shifts = ShiftService::new(donations.clone(), shift_events_tx.clone(), metrics.clone());

        Self {
            donations,
            volunteers,
            identity,
            shifts,
            shift_events_tx,
            metrics,
        }
    }
}
