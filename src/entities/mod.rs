//! Entity module - Contains all SeaORM entity definitions for the backend collections.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod badge;
pub mod certificate;
pub mod points_transaction;
pub mod program;
pub mod task;
pub mod trip;
pub mod user;
pub mod user_badge;
pub mod user_certificate;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

// Re-export specific types to avoid conflicts
pub use badge::{Column as BadgeColumn, Entity as Badge, Model as BadgeModel};
pub use certificate::{Column as CertificateColumn, Entity as Certificate, Model as CertificateModel};
pub use points_transaction::{
    Column as PointsTransactionColumn, Entity as PointsTransaction,
    Model as PointsTransactionModel,
};
pub use program::{Column as ProgramColumn, Entity as Program, Model as ProgramModel};
pub use task::{Column as TaskColumn, Entity as Task, Model as TaskModel};
pub use trip::{Column as TripColumn, Entity as Trip, Model as TripModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel, Role};
pub use user_badge::{Column as UserBadgeColumn, Entity as UserBadge, Model as UserBadgeModel};
pub use user_certificate::{
    Column as UserCertificateColumn, Entity as UserCertificate, Model as UserCertificateModel,
};

/// A list of names or short phrases stored as a JSON array column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct NameList(pub Vec<String>);

impl NameList {
    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries joined with a comma, for display
    #[must_use]
    pub fn joined(&self) -> String {
        self.0.join(", ")
    }
}

impl From<Vec<String>> for NameList {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}
