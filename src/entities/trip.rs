//! Trip entity - A scheduled outing or camp.
//!
//! Trips are display-only: they are seeded from configuration and listed,
//! never edited through the bot.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::NameList;

/// Lifecycle of a trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    #[sea_orm(string_value = "upcoming")]
    Upcoming,
    #[sea_orm(string_value = "ongoing")]
    Ongoing,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Trip database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_date: Date,
    pub end_date: Date,
    pub location: String,
    pub max_participants: i32,
    /// Names of the members signed up
    #[sea_orm(column_type = "Json")]
    pub participants: NameList,
    /// Conditions a member must meet to join
    #[sea_orm(column_type = "Json")]
    pub requirements: NameList,
    pub image_url: String,
    pub status: TripStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
