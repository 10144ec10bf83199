//! Certificate entity - A certificate type that can be issued to members.
//!
//! Certificates carry two optional attachments in the `certificates` bucket:
//! a preview image and a printable template.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Certificate database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "certificates")]
pub struct Model {
    /// Unique identifier for the certificate
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Public URL of the preview image, empty when none
    pub image_url: String,
    /// Public URL of the printable template, empty when none
    pub template_url: String,
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Certificate and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One certificate type has many issued copies
    #[sea_orm(has_many = "super::user_certificate::Entity")]
    UserCertificates,
}

impl Related<super::user_certificate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCertificates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
