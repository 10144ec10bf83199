//! Session checks for commands that need a signed-in member.

use crate::{
    bot::BotData,
    entities::{User, UserModel},
    errors::{Error, Result},
    gateway::fetch_by_id,
};

/// Command check: lets the command run only for signed-in members.
///
/// Signed-out members are pointed to `/start` instead.
pub async fn require_session(ctx: poise::Context<'_, BotData, Error>) -> Result<bool> {
    let auth_id = ctx.author().id.to_string();
    if ctx.data().sessions.current_user(&auth_id).await.is_some() {
        return Ok(true);
    }
    ctx.say("🔒 You are not signed in. Use `/start` to sign in or register.")
        .await?;
    Ok(false)
}

/// The signed-in member, re-read from the backend so points and profile
/// fields are current.
pub async fn current_member(ctx: poise::Context<'_, BotData, Error>) -> Result<UserModel> {
    let auth_id = ctx.author().id.to_string();
    let session = ctx
        .data()
        .sessions
        .current_user(&auth_id)
        .await
        .ok_or(Error::NotSignedIn)?;
    fetch_by_id::<_, User>(&ctx.data().gateway, session.id).await
}
