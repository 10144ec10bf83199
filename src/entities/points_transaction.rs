//! Points transaction entity - An immutable record of points granted or removed.
//!
//! `points` is a signed delta. The affected user's cached `points` total is
//! updated separately by the points flow.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Points transaction database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "points_transactions")]
pub struct Model {
    /// Unique identifier for the transaction
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User receiving the points
    pub user_id: i64,
    /// Signed points delta
    pub points: i32,
    /// Why the points were granted
    pub reason: String,
    /// User (leader) who granted the points
    pub created_by: i64,
    pub created_at: DateTimeUtc,
}

/// Defines relationships between `PointsTransaction` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The user receiving the points
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    Recipient,
    /// The leader who granted them
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id"
    )]
    Creator,
}

impl ActiveModelBehavior for ActiveModel {}

/// A points transaction that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPointsTransaction {
    pub user_id: i64,
    pub points: i32,
    pub reason: String,
    pub created_by: i64,
}

impl NewPointsTransaction {
    /// Builds the insertable row, stamped with `created_at`.
    #[must_use]
    pub fn into_active_model(self, created_at: DateTimeUtc) -> ActiveModel {
        ActiveModel {
            user_id: sea_orm::Set(self.user_id),
            points: sea_orm::Set(self.points),
            reason: sea_orm::Set(self.reason),
            created_by: sea_orm::Set(self.created_by),
            created_at: sea_orm::Set(created_at),
            ..Default::default()
        }
    }
}
