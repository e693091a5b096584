//! API endpoint handlers.
//!
//! Pipeline handlers move the blocking work onto `spawn_blocking`; the
//! rest are thin adapters over the vault and reminder store.

pub mod auth;
pub mod documents;
pub mod health;
pub mod pipelines;
pub mod reminders;
pub mod upload;
