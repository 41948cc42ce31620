use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShiftEventKind {
    Claimed,
    Released,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftEvent {
    pub kind: ShiftEventKind,
    pub donation_id: Uuid,
    pub volunteer_email: String,
    pub at: DateTime<Utc>,
}

impl ShiftEvent {
    pub fn new(kind: ShiftEventKind, donation_id: Uuid, volunteer_email: &str) -> Self {
        Self {
            kind,
            donation_id,
            volunteer_email: volunteer_email.to_string(),
            at: Utc::now(),
        }
    }
}
