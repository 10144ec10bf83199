//! Resolves what a member typed or attached into records and uploads.

use crate::{
    bot::BotData,
    core::{badge::Upload, user::resolve_member},
    entities::{BadgeModel, CertificateModel, UserModel},
    errors::{Error, Result},
    query::QuerySnapshot,
};
use poise::serenity_prelude as serenity;
use std::sync::Arc;

fn rows<T>(snapshot: QuerySnapshot<T>, noun: &str) -> Result<Arc<Vec<T>>> {
    match (snapshot.data, snapshot.error) {
        (Some(rows), _) => Ok(rows),
        (None, Some(message)) => Err(Error::Database(message)),
        (None, None) => Err(Error::validation(format!(
            "The {noun} list is still loading, please try again"
        ))),
    }
}

/// Badge whose name matches `name`, ignoring case.
pub async fn find_badge(data: &BotData, name: &str) -> Result<BadgeModel> {
    let badges = rows(data.badges().await, "badge")?;
    let wanted = name.trim().to_lowercase();
    badges
        .iter()
        .find(|b| b.name.to_lowercase() == wanted)
        .cloned()
        .ok_or_else(|| Error::validation(format!("No badge named \"{}\"", name.trim())))
}

/// Certificate whose name matches `name`, ignoring case.
pub async fn find_certificate(data: &BotData, name: &str) -> Result<CertificateModel> {
    let certs = rows(data.certificates().await, "certificate")?;
    let wanted = name.trim().to_lowercase();
    certs
        .iter()
        .find(|c| c.name.to_lowercase() == wanted)
        .cloned()
        .ok_or_else(|| Error::validation(format!("No certificate named \"{}\"", name.trim())))
}

/// Every member, ordered by name.
pub async fn all_members(data: &BotData) -> Result<Arc<Vec<UserModel>>> {
    rows(data.users().await, "member")
}

/// Member referred to by national id, name or autocomplete label.
pub async fn find_member(data: &BotData, input: &str) -> Result<UserModel> {
    let users = all_members(data).await?;
    resolve_member(&users, input)
        .cloned()
        .ok_or_else(|| Error::validation(format!("No member matches \"{}\"", input.trim())))
}

/// Downloads an optional attachment for upload.
pub async fn download(attachment: Option<serenity::Attachment>) -> Result<Option<Upload>> {
    match attachment {
        Some(attachment) => {
            let bytes = attachment.download().await?;
            Ok(Some(Upload {
                file_name: attachment.filename,
                bytes,
            }))
        }
        None => Ok(None),
    }
}
