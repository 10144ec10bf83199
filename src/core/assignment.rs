//! Relationship assigner - awards badges and issues certificates to users.
//!
//! The same badge or certificate may be assigned to a user more than once;
//! every assignment is its own join record.

use crate::{
    entities::{UserBadge, UserCertificate, user_badge, user_certificate},
    errors::{Error, Result},
    gateway::{Gateway, Query},
};
use sea_orm::{ColumnTrait, Order, Set};
use tracing::info;

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Awards `badge_id` to `user_id`.
///
/// Both must be selected; a missing selection fails before any request.
pub async fn assign_badge<G: Gateway>(
    gateway: &G,
    badge_id: Option<i64>,
    user_id: Option<i64>,
    notes: Option<String>,
) -> Result<()> {
    let (Some(badge_id), Some(user_id)) = (badge_id, user_id) else {
        return Err(Error::validation("Please select both a badge and a member"));
    };

    let record = user_badge::ActiveModel {
        user_id: Set(user_id),
        badge_id: Set(badge_id),
        notes: Set(blank_to_none(notes)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    gateway.insert::<UserBadge>(vec![record]).await?;
    info!("Awarded badge {} to user {}", badge_id, user_id);
    Ok(())
}

/// Issues `certificate_id` to `user_id`, optionally with a certificate number.
pub async fn issue_certificate<G: Gateway>(
    gateway: &G,
    certificate_id: Option<i64>,
    user_id: Option<i64>,
    certificate_number: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    let (Some(certificate_id), Some(user_id)) = (certificate_id, user_id) else {
        return Err(Error::validation(
            "Please select both a certificate and a member",
        ));
    };

    let record = user_certificate::ActiveModel {
        user_id: Set(user_id),
        certificate_id: Set(certificate_id),
        certificate_number: Set(blank_to_none(certificate_number)),
        notes: Set(blank_to_none(notes)),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    gateway.insert::<UserCertificate>(vec![record]).await?;
    info!("Issued certificate {} to user {}", certificate_id, user_id);
    Ok(())
}

/// Badges awarded to a user, newest first.
pub async fn badges_for_user<G: Gateway>(
    gateway: &G,
    user_id: i64,
) -> Result<Vec<user_badge::Model>> {
    gateway
        .fetch::<UserBadge>(
            Query::all()
                .filter(user_badge::Column::UserId.eq(user_id))
                .order_by(user_badge::Column::CreatedAt, Order::Desc),
        )
        .await
}

/// Certificates issued to a user, newest first.
pub async fn certificates_for_user<G: Gateway>(
    gateway: &G,
    user_id: i64,
) -> Result<Vec<user_certificate::Model>> {
    gateway
        .fetch::<UserCertificate>(
            Query::all()
                .filter(user_certificate::Column::UserId.eq(user_id))
                .order_by(user_certificate::Column::CreatedAt, Order::Desc),
        )
        .await
}
