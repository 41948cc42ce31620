pub mod queries;
pub mod registrations;
pub mod shifts;
