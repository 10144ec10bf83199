//! Activity commands - trips, tasks and programs.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::session::require_session, render::list_reply},
        core::activity,
        errors::{Error, Result},
        presenter::ListView,
    };

    /// Lists trips, optionally filtered by title or description.
    #[poise::command(slash_command, check = "require_session")]
    pub async fn trips(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Search by title or description"] search: Option<String>,
    ) -> Result<()> {
        let trips = activity::list_trips(&ctx.data().gateway).await?;
        let query = search.unwrap_or_default();
        let view = ListView::from_rows(&trips, &query);
        let reply = list_reply("🏕️ Trips", "trips", &view, |t| {
            (
                format!("{} ({:?})", t.title, t.status),
                format!(
                    "{}\n📍 {} · {} to {}\n👥 {}/{} · Needs: {}",
                    t.description,
                    t.location,
                    t.start_date,
                    t.end_date,
                    t.participants.len(),
                    t.max_participants,
                    t.requirements.joined()
                ),
            )
        });
        ctx.send(reply).await?;
        Ok(())
    }

    /// Lists tasks, optionally filtered by title or description.
    #[poise::command(slash_command, check = "require_session")]
    pub async fn tasks(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Search by title or description"] search: Option<String>,
    ) -> Result<()> {
        let tasks = activity::list_tasks(&ctx.data().gateway).await?;
        let query = search.unwrap_or_default();
        let view = ListView::from_rows(&tasks, &query);
        let reply = list_reply("📋 Tasks", "tasks", &view, |t| {
            (
                format!("{} ({:?}, {:?} priority)", t.title, t.status, t.priority),
                format!(
                    "{}\nDue {} · Assigned to {}",
                    t.description,
                    t.due_date,
                    t.assigned_to.joined()
                ),
            )
        });
        ctx.send(reply).await?;
        Ok(())
    }

    /// Lists programs, optionally filtered by title or description.
    #[poise::command(slash_command, check = "require_session")]
    pub async fn programs(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Search by title or description"] search: Option<String>,
    ) -> Result<()> {
        let programs = activity::list_programs(&ctx.data().gateway).await?;
        let query = search.unwrap_or_default();
        let view = ListView::from_rows(&programs, &query);
        let reply = list_reply("🎯 Programs", "programs", &view, |p| {
            (
                format!("{} ({:?})", p.title, p.status),
                format!(
                    "{}\n📍 {} · {} to {}\nLed by {}",
                    p.description, p.location, p.start_date, p.end_date, p.responsible
                ),
            )
        });
        ctx.send(reply).await?;
        Ok(())
    }
}

pub use inner::*;
