//! Profile commands - view, edit and look up member profiles.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::session::{current_member, require_session},
            render::{EMBED_COLOR, non_empty},
        },
        core::{assignment, user},
        entities::UserModel,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    async fn profile_embed(data: &BotData, member: &UserModel) -> Result<serenity::CreateEmbed> {
        let (badges, certificates) = tokio::join!(
            assignment::badges_for_user(&data.gateway, member.id),
            assignment::certificates_for_user(&data.gateway, member.id),
        );
        let text = |value: &Option<String>| non_empty(value.clone().unwrap_or_default());

        Ok(serenity::CreateEmbed::default()
            .title(format!("👤 {}", member.full_name))
            .color(EMBED_COLOR)
            .fields(vec![
                ("National id", member.national_id.clone(), true),
                ("Role", format!("{:?}", member.role), true),
                ("Points", member.points.to_string(), true),
                ("Badges", badges?.len().to_string(), true),
                ("Certificates", certificates?.len().to_string(), true),
                ("Email", text(&member.email), false),
                ("Phone", text(&member.phone_number), false),
                ("Address", text(&member.address), false),
                (
                    "Date of birth",
                    non_empty(member.date_of_birth.map(|d| d.to_string()).unwrap_or_default()),
                    false,
                ),
                ("Bio", text(&member.bio), false),
            ]))
    }

    /// Parent command for profiles.
    #[poise::command(
        slash_command,
        check = "require_session",
        subcommands("profile_show", "profile_edit", "profile_lookup")
    )]
    pub async fn profile(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Profiles. Available subcommands:\n\
            `/profile show` - Your profile\n\
            `/profile edit` - Edit your profile\n\
            `/profile lookup <national_id>` - Find a member by national id";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows your profile.
    #[poise::command(slash_command, rename = "show", check = "require_session")]
    pub async fn profile_show(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let member = current_member(ctx).await?;
        let embed = profile_embed(ctx.data(), &member).await?;
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Edits your profile; fields left out keep their current value.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, rename = "edit", check = "require_session")]
    pub async fn profile_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Full name"] full_name: Option<String>,
        #[description = "Email address"] email: Option<String>,
        #[description = "Phone number"] phone_number: Option<String>,
        #[description = "Address"] address: Option<String>,
        #[description = "Date of birth (YYYY-MM-DD)"] date_of_birth: Option<String>,
        #[description = "A few words about you"] bio: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let member = current_member(ctx).await?;

        let mut form = user::profile_form(&member);
        form.set_if_some("full_name", full_name);
        form.set_if_some("email", email);
        form.set_if_some("phone_number", phone_number);
        form.set_if_some("address", address);
        form.set_if_some("date_of_birth", date_of_birth);
        form.set_if_some("bio", bio);
        let updated = user::update_profile(&data.gateway, &mut form).await?;
        data.invalidate_users().await;

        let embed = profile_embed(data, &updated).await?;
        ctx.send(
            poise::CreateReply::default()
                .content("✅ Profile updated.")
                .embed(embed),
        )
        .await?;
        Ok(())
    }

    /// Finds a member by national id.
    #[poise::command(slash_command, rename = "lookup", check = "require_session")]
    pub async fn profile_lookup(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "National id number"] national_id: String,
    ) -> Result<()> {
        let data = ctx.data();
        let Some(member) = user::find_by_national_id(&data.gateway, &national_id).await? else {
            ctx.say(format!("🔍 No member with national id {}.", national_id.trim()))
                .await?;
            return Ok(());
        };

        let embed = profile_embed(data, &member).await?;
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

pub use inner::*;
