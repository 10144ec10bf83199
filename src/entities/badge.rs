//! Badge entity - An award that leaders hand out to members.
//!
//! The badge image lives in the `badges` storage bucket; `image_url` holds its
//! public URL, or an empty string when no image was uploaded.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Badge database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "badges")]
pub struct Model {
    /// Unique identifier for the badge
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Badge name (e.g., "First Aid")
    pub name: String,
    /// What the badge is awarded for
    pub description: String,
    /// Public URL of the badge image, empty when none
    pub image_url: String,
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Badge and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One badge has many awards
    #[sea_orm(has_many = "super::user_badge::Entity")]
    UserBadges,
}

impl Related<super::user_badge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserBadges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
