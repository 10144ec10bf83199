//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions come from the bot's query caches, so typing does not hit the
//! backend on every keystroke.

use crate::{
    bot::BotData,
    core::user::member_label,
    errors::Error,
    presenter::{Searchable, matches},
};

/// Discord autocomplete limit
const MAX_SUGGESTIONS: usize = 25;

fn suggest<T: Searchable>(items: &[T], partial: &str, label: impl Fn(&T) -> String) -> Vec<String> {
    let mut matching: Vec<String> = items
        .iter()
        .filter(|item| matches(*item, partial))
        .map(label)
        .take(MAX_SUGGESTIONS)
        .collect();
    matching.sort();
    matching.dedup();
    matching
}

/// Suggests badge names matching the partial input.
pub async fn autocomplete_badge(ctx: poise::Context<'_, BotData, Error>, partial: &str) -> Vec<String> {
    ctx.data()
        .badges()
        .await
        .data
        .map(|badges| suggest(badges.as_slice(), partial, |b| b.name.clone()))
        .unwrap_or_default()
}

/// Suggests certificate names matching the partial input.
pub async fn autocomplete_certificate(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    ctx.data()
        .certificates()
        .await
        .data
        .map(|certs| suggest(certs.as_slice(), partial, |c| c.name.clone()))
        .unwrap_or_default()
}

/// Suggests members as `Full Name (national id)`, matching name or national id.
pub async fn autocomplete_member(ctx: poise::Context<'_, BotData, Error>, partial: &str) -> Vec<String> {
    ctx.data()
        .users()
        .await
        .data
        .map(|users| suggest(users.as_slice(), partial, member_label))
        .unwrap_or_default()
}
