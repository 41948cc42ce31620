use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::assignment::Assignment;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: Uuid,
    pub org_name: String,
    pub contact_person: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub food_type: String,
    pub pickup_time: String,
    #[serde(default)]
    pub address: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_email: Option<String>,
    /// A missing field reads as an empty sequence.
    #[serde(default)]
    pub assigned_volunteers: Vec<Assignment>,
}

impl Donation {
    pub fn from_new(new: NewDonation) -> Self {
        Self {
            id: Uuid::new_v4(),
            org_name: new.org_name,
            contact_person: new.contact_person,
            donor_email: new.donor_email,
            donor_phone: new.donor_phone,
            food_type: new.food_type,
            pickup_time: new.pickup_time,
            address: new.address,
            created_at: Utc::now(),
            owner_email: new.owner_email,
            assigned_volunteers: Vec::new(),
        }
    }

    pub fn is_assigned_to(&self, email: &str) -> bool {
        self.assigned_volunteers
            .iter()
            .any(|assignment| assignment.email == email)
    }

    pub fn is_owned_by(&self, email: &str) -> bool {
        self.donor_email == email || self.owner_email.as_deref() == Some(email)
    }

    /// Applies donor field edits. The assignment sequence is never touched here.
    pub fn apply(&mut self, patch: DonationPatch) {
        if let Some(org_name) = patch.org_name {
            self.org_name = org_name;
        }
        if let Some(contact_person) = patch.contact_person {
            self.contact_person = contact_person;
        }
        if let Some(donor_email) = patch.donor_email {
            self.donor_email = donor_email;
        }
        if let Some(donor_phone) = patch.donor_phone {
            self.donor_phone = donor_phone;
        }
        if let Some(food_type) = patch.food_type {
            self.food_type = food_type;
        }
        if let Some(pickup_time) = patch.pickup_time {
            self.pickup_time = pickup_time;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
    }
}

/// A validated donor submission, before the store assigns an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDonation {
    pub org_name: String,
    pub contact_person: String,
    pub donor_email: String,
    pub donor_phone: String,
    pub food_type: String,
    pub pickup_time: String,
    pub address: String,
    pub owner_email: Option<String>,
}

/// Validated field edits; `None` leaves the field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonationPatch {
    pub org_name: Option<String>,
    pub contact_person: Option<String>,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub food_type: Option<String>,
    pub pickup_time: Option<String>,
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bakery() -> NewDonation {
        NewDonation {
            org_name: "Panaderia La Esperanza".to_string(),
            contact_person: "Juan Perez".to_string(),
            donor_email: "juan@esperanza.com".to_string(),
            donor_phone: "5512345678".to_string(),
            food_type: "Pan dulce".to_string(),
            pickup_time: "Lunes a Viernes, 8pm".to_string(),
            address: String::new(),
            owner_email: Some("owner@esperanza.com".to_string()),
        }
    }

    #[test]
    fn missing_assignment_field_reads_as_empty() {
        let raw = serde_json::json!({
            "id": "6f1c1f4e-7f1a-4d2b-9d52-0a4b8f1f0f11",
            "orgName": "Mercado de Abastos",
            "contactPerson": "Maria Gonzalez",
            "donorEmail": "maria@abastos.com",
            "donorPhone": "3312345678",
            "foodType": "Frutas y verduras",
            "pickupTime": "Martes, 7am",
            "createdAt": "2026-01-05T10:00:00Z"
        });

        let donation: Donation = serde_json::from_value(raw).unwrap();
        assert!(donation.assigned_volunteers.is_empty());
        assert!(donation.address.is_empty());
    }

    #[test]
    fn patch_leaves_assignments_alone() {
        let mut donation = Donation::from_new(bakery());
        donation
            .assigned_volunteers
            .push(Assignment::new("a@x.com".to_string(), "Ana".to_string()));

        donation.apply(DonationPatch {
            food_type: Some("Bolillos".to_string()),
            ..DonationPatch::default()
        });

        assert_eq!(donation.food_type, "Bolillos");
        assert_eq!(donation.org_name, "Panaderia La Esperanza");
        assert_eq!(donation.assigned_volunteers.len(), 1);
    }

    #[test]
    fn ownership_matches_donor_or_owner_email() {
        let donation = Donation::from_new(bakery());
        assert!(donation.is_owned_by("juan@esperanza.com"));
        assert!(donation.is_owned_by("owner@esperanza.com"));
        assert!(!donation.is_owned_by("someone@else.com"));
    }
}
