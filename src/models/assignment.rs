use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One volunteer's claim on a donation's pickup. Lives only inside its
/// parent donation's `assignedVolunteers` sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub email: String,
    pub name: String,
    pub assigned_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(email: String, name: String) -> Self {
        Self {
            email,
            name,
            assigned_at: Utc::now(),
        }
    }
}
