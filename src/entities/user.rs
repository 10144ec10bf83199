//! User entity - A registered member of the scout organization.
//!
//! Users are created at registration, mutated by profile edits and point
//! transactions, and never deleted. `points` is a cached total of the
//! user's points transactions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role of a member within the organization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Leader with access to the management commands
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Regular member
    #[sea_orm(string_value = "scout")]
    Scout,
}

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Identity issued by the auth provider (the Discord user id for the bot)
    #[sea_orm(unique)]
    pub auth_id: String,
    /// National identity number, used for lookups by leaders
    pub national_id: String,
    /// Display name
    pub full_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<Date>,
    pub bio: Option<String>,
    pub role: Role,
    /// Cached points total, never negative
    pub points: i32,
    pub created_at: DateTimeUtc,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Badges awarded to this user
    #[sea_orm(has_many = "super::user_badge::Entity")]
    UserBadges,
    /// Certificates issued to this user
    #[sea_orm(has_many = "super::user_certificate::Entity")]
    UserCertificates,
}

impl Related<super::user_badge::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserBadges.def()
    }
}

impl Related<super::user_certificate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCertificates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
