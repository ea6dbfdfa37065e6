//! Business logic services.

pub mod dashboard;
pub mod expense;
pub mod export;
pub mod sale;
