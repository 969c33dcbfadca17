pub mod absences;
pub mod auth;
pub mod catalog;
pub mod credit;
pub mod floor;
pub mod orders;
pub mod payments;
pub mod reports;
pub mod sessions;
