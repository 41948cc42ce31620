use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    WeekdayMornings,
    WeekdayAfternoons,
    Weekends,
    Flexible,
}

impl std::str::FromStr for Availability {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "weekday_mornings" => Ok(Availability::WeekdayMornings),
            "weekday_afternoons" => Ok(Availability::WeekdayAfternoons),
            "weekends" => Ok(Availability::Weekends),
            "flexible" => Ok(Availability::Flexible),
            other => Err(format!("unknown availability '{other}'")),
        }
    }
}

/// Standalone driver sign-up, keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerRegistration {
    pub id: Uuid,
    pub volunteer_name: String,
    pub volunteer_email: String,
    pub volunteer_phone: String,
    pub availability: Availability,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVolunteer {
    pub volunteer_name: String,
    pub volunteer_email: String,
    pub volunteer_phone: String,
    pub availability: Availability,
}

impl VolunteerRegistration {
    pub fn from_new(new: NewVolunteer) -> Self {
        Self {
            id: Uuid::new_v4(),
            volunteer_name: new.volunteer_name,
            volunteer_email: new.volunteer_email,
            volunteer_phone: new.volunteer_phone,
            availability: new.availability,
            created_at: Utc::now(),
        }
    }
}
