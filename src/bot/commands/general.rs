//! General Discord commands - ping, help, start, dashboard and settings.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::session::{current_member, require_session},
            render::{EMBED_COLOR, non_empty},
        },
        core::dashboard,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Scout Hub Help**\n\
        Here is a summary of all available commands.\n\n\
        **Getting Started**\n\
        • `/start` - Sign-in page, or your dashboard when signed in.\n\
        • `/register <national_id> <full_name> [email]` - Create your account.\n\
        • `/login` / `/logout` - Start or end your session.\n\n\
        **Members**\n\
        • `/dashboard` - Your points, badges, certificates, trips and tasks.\n\
        • `/profile show|edit|lookup` - View or edit profiles.\n\n\
        **Management**\n\
        • `/badges list|create|edit|delete|assign` - Badges and awards.\n\
        • `/certificates list|create|edit|delete|issue` - Certificates.\n\
        • `/points members|grant|history` - Points for members.\n\n\
        **Activities**\n\
        • `/trips`, `/tasks`, `/programs` - Activity listings.\n\n\
        **Utility**\n\
        • `/settings` - Session and app settings.\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Entry page: shows the dashboard when signed in, sign-in help otherwise.
    #[poise::command(slash_command)]
    pub async fn start(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let auth_id = ctx.author().id.to_string();
        if ctx.data().sessions.current_user(&auth_id).await.is_some() {
            return send_dashboard(ctx).await;
        }

        ctx.say(
            "👋 **Welcome to Scout Hub!**\n\
             • Already registered? Use `/login`.\n\
             • New here? Use `/register` with your national id and full name.",
        )
        .await?;
        Ok(())
    }

    /// Shows your points, awards and what is coming up.
    #[poise::command(slash_command, check = "require_session")]
    pub async fn dashboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        send_dashboard(ctx).await
    }

    async fn send_dashboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let member = current_member(ctx).await?;
        let today = chrono::Utc::now().date_naive();
        let summary = dashboard::summary(&ctx.data().gateway, member.id, today).await?;

        let mut trips = String::new();
        for trip in &summary.upcoming_trips {
            writeln!(&mut trips, "• **{}** - {} ({})", trip.title, trip.start_date, trip.location)?;
        }
        let mut tasks = String::new();
        for task in &summary.open_tasks {
            writeln!(&mut tasks, "• **{}** - due {}", task.title, task.due_date)?;
        }

        let embed = serenity::CreateEmbed::default()
            .title(format!("Welcome, {}!", summary.full_name))
            .color(EMBED_COLOR)
            .fields(vec![
                ("Points", summary.points.to_string(), true),
                ("Badges", summary.badge_count.to_string(), true),
                ("Certificates", summary.certificate_count.to_string(), true),
                ("Upcoming trips", non_empty(trips), false),
                ("Open tasks", non_empty(tasks), false),
            ]);
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows your session and the app's settings.
    #[poise::command(slash_command, check = "require_session")]
    pub async fn settings(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let member = current_member(ctx).await?;
        let config = &data.config;

        let embed = serenity::CreateEmbed::default()
            .title("⚙️ Settings")
            .color(EMBED_COLOR)
            .fields(vec![
                ("Signed in as", format!("{} ({:?})", member.full_name, member.role), false),
                ("Open sessions", data.sessions.active_sessions().await.to_string(), true),
                ("Points mode", format!("{:?}", config.points.mode), true),
                (
                    "List cache",
                    format!("{} seconds", config.query.stale_after_secs),
                    true,
                ),
                ("Storage", config.storage.root.display().to_string(), false),
                ("Public files", config.storage.public_base_url.clone(), false),
            ]);
        ctx.send(poise::CreateReply::default().embed(embed).ephemeral(true))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
