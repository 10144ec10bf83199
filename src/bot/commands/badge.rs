//! Badge commands - list, create, edit, delete and award badges.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{
                autocomplete,
                lookup::{download, find_badge, find_member},
                session::require_session,
            },
            render::list_reply,
        },
        core::{assignment, badge},
        errors::{Error, Result},
        presenter::ListView,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Parent command for managing badges.
    #[poise::command(
        slash_command,
        check = "require_session",
        subcommands("badge_list", "badge_create", "badge_edit", "badge_delete", "badge_assign")
    )]
    pub async fn badges(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Badge management. Available subcommands:\n\
            `/badges list [search]` - List badges\n\
            `/badges create` - Create a badge\n\
            `/badges edit` - Edit a badge\n\
            `/badges delete` - Delete a badge\n\
            `/badges assign` - Award a badge to a member";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Lists badges, optionally filtered by name or description.
    #[poise::command(slash_command, rename = "list", check = "require_session")]
    pub async fn badge_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Search by name or description"] search: Option<String>,
    ) -> Result<()> {
        let snapshot = ctx.data().badges().await;
        let query = search.unwrap_or_default();
        let view = ListView::from_snapshot(&snapshot, &query);
        let reply = list_reply("🏅 Badges", "badges", &view, |b| {
            let mut value = b.description.clone();
            if !b.image_url.is_empty() {
                let _ = write!(value, "\n[Image]({})", b.image_url);
            }
            (b.name.clone(), value)
        });
        ctx.send(reply).await?;
        Ok(())
    }

    /// Creates a badge with an optional image.
    #[poise::command(slash_command, rename = "create", check = "require_session")]
    pub async fn badge_create(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Badge name"] name: String,
        #[description = "What the badge is awarded for"] description: String,
        #[description = "Badge image (optional)"] image: Option<serenity::Attachment>,
    ) -> Result<()> {
        ctx.defer().await?;
        let data = ctx.data();

        let mut form = badge::new_form();
        form.set("name", name);
        form.set("description", description);
        let upload = download(image).await?;
        let saved_name = badge::save_badge(&data.gateway, &mut form, upload).await?;
        data.refresh_badges().await;

        ctx.say(format!("✅ Created badge **{saved_name}**.")).await?;
        Ok(())
    }

    /// Edits a badge; fields left out keep their current value.
    #[poise::command(slash_command, rename = "edit", check = "require_session")]
    pub async fn badge_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Badge to edit"]
        #[autocomplete = "autocomplete::autocomplete_badge"]
        badge: String,
        #[description = "New name"] name: Option<String>,
        #[description = "New description"] description: Option<String>,
        #[description = "New image"] image: Option<serenity::Attachment>,
    ) -> Result<()> {
        ctx.defer().await?;
        let data = ctx.data();
        let existing = find_badge(data, &badge).await?;

        let mut form = badge::edit_form(&existing);
        form.set_if_some("name", name);
        form.set_if_some("description", description);
        let upload = download(image).await?;
        let saved_name = badge::save_badge(&data.gateway, &mut form, upload).await?;
        data.refresh_badges().await;

        ctx.say(format!("✅ Updated badge **{saved_name}**.")).await?;
        Ok(())
    }

    /// Deletes a badge and every award of it.
    #[poise::command(slash_command, rename = "delete", check = "require_session")]
    pub async fn badge_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Badge to delete"]
        #[autocomplete = "autocomplete::autocomplete_badge"]
        badge: String,
    ) -> Result<()> {
        let data = ctx.data();
        let existing = find_badge(data, &badge).await?;
        badge::delete_badge(&data.gateway, existing.id).await?;
        data.refresh_badges().await;

        ctx.say(format!("🗑️ Deleted badge **{}**.", existing.name)).await?;
        Ok(())
    }

    /// Awards a badge to a member.
    #[poise::command(slash_command, rename = "assign", check = "require_session")]
    pub async fn badge_assign(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Badge to award"]
        #[autocomplete = "autocomplete::autocomplete_badge"]
        badge: String,
        #[description = "Member receiving the badge"]
        #[autocomplete = "autocomplete::autocomplete_member"]
        member: String,
        #[description = "Notes (optional)"] notes: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let badge = find_badge(data, &badge).await?;
        let member = find_member(data, &member).await?;

        assignment::assign_badge(&data.gateway, Some(badge.id), Some(member.id), notes).await?;
        ctx.say(format!(
            "🏅 Awarded **{}** to **{}**.",
            badge.name, member.full_name
        ))
        .await?;
        Ok(())
    }
}

pub use inner::*;
