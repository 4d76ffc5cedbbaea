//! API route handlers

pub mod health;
pub mod metrics;
pub mod presence;
pub mod sources;
