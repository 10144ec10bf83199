//! Discord interaction handlers
//!
//! Autocomplete suggestions, input lookups and the session check that
//! guards commands.

/// Autocomplete handlers for badge, certificate and member names
pub mod autocomplete;
/// Resolving command inputs to records and uploads
pub mod lookup;
/// Session check and current-member lookup
pub mod session;
