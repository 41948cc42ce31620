//! Persistence ports for donations and volunteer registrations.

pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::assignment::Assignment;
use crate::models::donation::{Donation, DonationPatch, NewDonation};
use crate::models::volunteer::{NewVolunteer, VolunteerRegistration};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    AlreadyPresent,
}

/// Storage of donation postings and their embedded assignment sequences.
///
/// The two assignment mutations are conditional, single-document operations:
/// implementations must make the membership check and the write one atomic
/// step so concurrent callers cannot both append the same email.
#[async_trait]
pub trait DonationStore: Send + Sync {
    async fn create(&self, donation: NewDonation) -> Result<Donation, AppError>;

    /// # Errors
    ///
    /// Returns `NotFound` if no donation has this id.
    async fn get(&self, id: Uuid) -> Result<Donation, AppError>;

    /// # Errors
    ///
    /// Returns `NotFound` if no donation has this id.
    async fn update(&self, id: Uuid, patch: DonationPatch) -> Result<Donation, AppError>;

    /// Removes the donation together with its assignments and returns it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no donation has this id.
    async fn delete(&self, id: Uuid) -> Result<Donation, AppError>;

    /// All donations ordered by creation time, then id.
    async fn list(&self) -> Result<Vec<Donation>, AppError>;

    async fn len(&self) -> Result<usize, AppError>;

    /// Appends `assignment` unless an entry with the same email exists.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no donation has this id.
    async fn append_assignment_if_absent(
        &self,
        id: Uuid,
        assignment: Assignment,
    ) -> Result<AppendOutcome, AppError>;

    /// Removes every entry for `email` and returns how many were removed.
    /// An unknown donation id removes nothing.
    async fn remove_assignments_by_email(&self, id: Uuid, email: &str) -> Result<usize, AppError>;
}

/// Storage of standalone driver sign-ups, unique by email.
#[async_trait]
pub trait VolunteerRegistry: Send + Sync {
    /// # Errors
    ///
    /// Returns `Conflict` if a registration with this email already exists.
    async fn register(&self, volunteer: NewVolunteer) -> Result<VolunteerRegistration, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<VolunteerRegistration>, AppError>;

    /// All registrations ordered by creation time, then id.
    async fn list(&self) -> Result<Vec<VolunteerRegistration>, AppError>;
}
