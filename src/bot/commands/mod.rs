//! Discord command implementations organized by screen.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Register, login and logout
pub mod account;

/// Trips, tasks and programs
pub mod activity;

/// Badge management
pub mod badge;

/// Certificate management
pub mod certificate;

/// Ping, help, start, dashboard and settings
pub mod general;

/// Points grants and history
pub mod points;

/// Member profiles
pub mod profile;

// Export commands
pub use account::*;
pub use activity::*;
pub use badge::*;
pub use certificate::*;
pub use general::*;
pub use points::*;
pub use profile::*;
