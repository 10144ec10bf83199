//! Core business logic - framework-agnostic operations over the [`Gateway`].
//!
//! Every function here takes the gateway by reference, so the bot, the
//! seeding code and the tests all drive the same logic.
//!
//! [`Gateway`]: crate::gateway::Gateway

/// Activity listings (trips, tasks, programs)
pub mod activity;
/// Awarding badges and issuing certificates
pub mod assignment;
/// Badge CRUD
pub mod badge;
/// Certificate CRUD
pub mod certificate;
/// Dashboard summary
pub mod dashboard;
/// Points grants and history
pub mod points;
/// Seeding from configuration
pub mod seed;
/// Registration, lookup and profiles
pub mod user;
