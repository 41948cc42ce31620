use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::assignment::Assignment;
use crate::models::donation::{Donation, DonationPatch, NewDonation};
use crate::models::volunteer::{NewVolunteer, VolunteerRegistration};
use crate::store::{AppendOutcome, DonationStore, VolunteerRegistry};

/// Donations held in a `DashMap`. Assignment mutations run while holding the
/// entry's shard write lock, which makes check-then-append atomic per donation.
#[derive(Default)]
pub struct InMemoryDonationStore {
    donations: DashMap<Uuid, Donation>,
}

impl InMemoryDonationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn donation_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("donation {id} not found"))
}

#[async_trait]
impl DonationStore for InMemoryDonationStore {
    async fn create(&self, donation: NewDonation) -> Result<Donation, AppError> {
        let donation = Donation::from_new(donation);
        self.donations.insert(donation.id, donation.clone());
        Ok(donation)
    }

    async fn get(&self, id: Uuid) -> Result<Donation, AppError> {
        self.donations
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| donation_not_found(id))
    }

    async fn update(&self, id: Uuid, patch: DonationPatch) -> Result<Donation, AppError> {
        let mut donation = self
            .donations
            .get_mut(&id)
            .ok_or_else(|| donation_not_found(id))?;

        donation.apply(patch);
        Ok(donation.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<Donation, AppError> {
        self.donations
            .remove(&id)
            .map(|(_, donation)| donation)
            .ok_or_else(|| donation_not_found(id))
    }

    async fn list(&self) -> Result<Vec<Donation>, AppError> {
        let mut donations: Vec<Donation> = self
            .donations
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        donations.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(donations)
    }

    async fn len(&self) -> Result<usize, AppError> {
        Ok(self.donations.len())
    }

    async fn append_assignment_if_absent(
        &self,
        id: Uuid,
        assignment: Assignment,
    ) -> Result<AppendOutcome, AppError> {
        let mut donation = self
            .donations
            .get_mut(&id)
            .ok_or_else(|| donation_not_found(id))?;

        if donation.is_assigned_to(&assignment.email) {
            return Ok(AppendOutcome::AlreadyPresent);
        }

        donation.assigned_volunteers.push(assignment);
        Ok(AppendOutcome::Appended)
    }

    async fn remove_assignments_by_email(&self, id: Uuid, email: &str) -> Result<usize, AppError> {
        let Some(mut donation) = self.donations.get_mut(&id) else {
            return Ok(0);
        };

        let before = donation.assigned_volunteers.len();
        donation
            .assigned_volunteers
            .retain(|assignment| assignment.email != email);
        Ok(before - donation.assigned_volunteers.len())
    }
}

/// Registrations keyed by normalized email; the `entry` API enforces uniqueness.
#[derive(Default)]
pub struct InMemoryVolunteerRegistry {
    by_email: DashMap<String, VolunteerRegistration>,
}

impl InMemoryVolunteerRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VolunteerRegistry for InMemoryVolunteerRegistry {
    async fn register(&self, volunteer: NewVolunteer) -> Result<VolunteerRegistration, AppError> {
        match self.by_email.entry(volunteer.volunteer_email.clone()) {
            Entry::Occupied(_) => Err(AppError::Conflict(format!(
                "a volunteer with email {} is already registered",
                volunteer.volunteer_email
            ))),
            Entry::Vacant(slot) => {
                let registration = VolunteerRegistration::from_new(volunteer);
                slot.insert(registration.clone());
                Ok(registration)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<VolunteerRegistration>, AppError> {
        Ok(self.by_email.get(email).map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> Result<Vec<VolunteerRegistration>, AppError> {
        let mut registrations: Vec<VolunteerRegistration> = self
            .by_email
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        registrations.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(registrations)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::volunteer::Availability;

    fn new_donation(org: &str) -> NewDonation {
        NewDonation {
            org_name: org.to_string(),
            contact_person: "Carlos Ruiz".to_string(),
            donor_email: "carlos@bariachi.com".to_string(),
            donor_phone: "3398765432".to_string(),
            food_type: "Guisados y arroz".to_string(),
            pickup_time: "Domingos, 10pm".to_string(),
            address: "Av. Vallarta 2221".to_string(),
            owner_email: None,
        }
    }

    fn new_volunteer(email: &str) -> NewVolunteer {
        NewVolunteer {
            volunteer_name: "Ana".to_string(),
            volunteer_email: email.to_string(),
            volunteer_phone: "3311223344".to_string(),
            availability: Availability::Weekends,
        }
    }

    #[tokio::test]
    async fn append_is_conditional_on_email() {
        let store = InMemoryDonationStore::new();
        let donation = store.create(new_donation("Casa Bariachi")).await.unwrap();

        let first = store
            .append_assignment_if_absent(
                donation.id,
                Assignment::new("a@x.com".to_string(), "Ana".to_string()),
            )
            .await
            .unwrap();
        let second = store
            .append_assignment_if_absent(
                donation.id,
                Assignment::new("a@x.com".to_string(), "Ana again".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(first, AppendOutcome::Appended);
        assert_eq!(second, AppendOutcome::AlreadyPresent);

        let stored = store.get(donation.id).await.unwrap();
        assert_eq!(stored.assigned_volunteers.len(), 1);
        assert_eq!(stored.assigned_volunteers[0].name, "Ana");
    }

    #[tokio::test]
    async fn append_to_unknown_donation_is_not_found() {
        let store = InMemoryDonationStore::new();
        let result = store
            .append_assignment_if_absent(
                Uuid::new_v4(),
                Assignment::new("a@x.com".to_string(), "Ana".to_string()),
            )
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn remove_keeps_order_of_remaining_entries() {
        let store = InMemoryDonationStore::new();
        let donation = store.create(new_donation("Fresko")).await.unwrap();
        for (email, name) in [("a@x.com", "Ana"), ("b@x.com", "Beto"), ("c@x.com", "Cata")] {
            store
                .append_assignment_if_absent(
                    donation.id,
                    Assignment::new(email.to_string(), name.to_string()),
                )
                .await
                .unwrap();
        }

        let removed = store
            .remove_assignments_by_email(donation.id, "b@x.com")
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let emails: Vec<String> = store
            .get(donation.id)
            .await
            .unwrap()
            .assigned_volunteers
            .into_iter()
            .map(|assignment| assignment.email)
            .collect();
        assert_eq!(emails, vec!["a@x.com", "c@x.com"]);
    }

    #[tokio::test]
    async fn remove_on_unknown_donation_removes_nothing() {
        let store = InMemoryDonationStore::new();
        let removed = store
            .remove_assignments_by_email(Uuid::new_v4(), "a@x.com")
            .await
            .unwrap();
        assert_eq!(removed, 0);
    }

    #[tokio::test]
    async fn delete_returns_donation_and_cascades() {
        let store = InMemoryDonationStore::new();
        let donation = store.create(new_donation("Abastos")).await.unwrap();
        store
            .append_assignment_if_absent(
                donation.id,
                Assignment::new("a@x.com".to_string(), "Ana".to_string()),
            )
            .await
            .unwrap();

        let deleted = store.delete(donation.id).await.unwrap();
        assert_eq!(deleted.assigned_volunteers.len(), 1);
        assert!(matches!(
            store.get(donation.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            store.delete(donation.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn list_is_ordered_by_creation() {
        let store = InMemoryDonationStore::new();
        let first = store.create(new_donation("First")).await.unwrap();
        let second = store.create(new_donation("Second")).await.unwrap();

        let ids: Vec<Uuid> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|donation| donation.id)
            .collect();
        let mut expected = vec![first, second];
        expected.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        assert_eq!(ids, expected.into_iter().map(|d| d.id).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn registry_rejects_duplicate_email() {
        let registry = InMemoryVolunteerRegistry::new();
        registry.register(new_volunteer("a@x.com")).await.unwrap();

        let duplicate = registry.register(new_volunteer("a@x.com")).await;
        assert!(matches!(duplicate, Err(AppError::Conflict(_))));
        assert_eq!(registry.list().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_registrations_keep_one() {
        let registry = Arc::new(InMemoryVolunteerRegistry::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let registry = registry.clone();
            handles.push(tokio::spawn(async move {
                registry.register(new_volunteer("race@x.com")).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        assert!(registry.find_by_email("race@x.com").await.unwrap().is_some());
    }
}
