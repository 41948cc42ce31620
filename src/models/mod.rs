pub mod assignment;
pub mod donation;
pub mod event;
pub mod volunteer;
