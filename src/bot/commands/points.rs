//! Points commands - member totals, grants and history.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{
                lookup::all_members,
                session::{current_member, require_session},
            },
            render::list_reply,
        },
        core::{
            points::{self, FlowState, PointsFlow, PointsGrant},
            user::resolve_member,
        },
        errors::{Error, Result},
        presenter::ListView,
    };

    /// Parent command for member points.
    #[poise::command(
        slash_command,
        check = "require_session",
        subcommands("points_members", "points_grant", "points_history")
    )]
    pub async fn points(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Member points. Available subcommands:\n\
            `/points members [search]` - Members and their totals\n\
            `/points grant` - Grant or remove points\n\
            `/points history [search]` - Every points transaction";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Lists members by name with their points.
    #[poise::command(slash_command, rename = "members", check = "require_session")]
    pub async fn points_members(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Search by name or national id"] search: Option<String>,
    ) -> Result<()> {
        let snapshot = ctx.data().users().await;
        let query = search.unwrap_or_default();
        let view = ListView::from_snapshot(&snapshot, &query);
        let reply = list_reply("⭐ Member points", "members", &view, |u| {
            (
                format!("{} ({})", u.full_name, u.national_id),
                format!("{} points", u.points),
            )
        });
        ctx.send(reply).await?;
        Ok(())
    }

    /// Grants points to members; use a negative number to remove points.
    #[poise::command(slash_command, rename = "grant", check = "require_session")]
    pub async fn points_grant(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Points per member (negative to remove)"] amount: i32,
        #[description = "Reason for the points"] reason: String,
        #[description = "Members, comma-separated national ids or names"] members: Option<String>,
        #[description = "Grant to every member"] everyone: Option<bool>,
    ) -> Result<()> {
        let data = ctx.data();
        let leader = current_member(ctx).await?;
        let users = all_members(data).await?;

        let mut grant = PointsGrant {
            points: amount,
            reason,
            created_by: leader.id,
            ..Default::default()
        };
        if everyone.unwrap_or(false) {
            grant.toggle_all(&users);
        }
        for entry in members.iter().flat_map(|m| m.split(',')) {
            if entry.trim().is_empty() {
                continue;
            }
            let member = resolve_member(&users, entry)
                .ok_or_else(|| Error::validation(format!("No member matches \"{}\"", entry.trim())))?;
            if !grant.user_ids.contains(&member.id) {
                grant.toggle(member.id);
            }
        }

        let mut flow = PointsFlow::new(data.config.points.mode);
        let result = flow.submit(&data.gateway, &grant).await;
        if !matches!(flow.state(), FlowState::Idle) {
            data.invalidate_users().await;
        }
        result?;

        let verb = if amount > 0 { "Granted" } else { "Removed" };
        ctx.say(format!(
            "✅ {verb} {} points for {} members: {}",
            amount.unsigned_abs(),
            grant.user_ids.len(),
            grant.reason.trim()
        ))
        .await?;
        Ok(())
    }

    /// Lists points transactions, newest first.
    #[poise::command(slash_command, rename = "history", check = "require_session")]
    pub async fn points_history(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Search by member name or reason"] search: Option<String>,
    ) -> Result<()> {
        let history = points::points_history(&ctx.data().gateway).await?;
        let query = search.unwrap_or_default();
        let view = ListView::from_rows(&history, &query);
        let reply = list_reply("📒 Points history", "transactions", &view, |h| {
            (
                format!("{:+} · {}", h.transaction.points, h.user_name),
                format!(
                    "{}\nby {} on {}",
                    h.transaction.reason,
                    h.creator_name,
                    h.transaction.created_at.format("%Y-%m-%d")
                ),
            )
        });
        ctx.send(reply).await?;
        Ok(())
    }
}

pub use inner::*;
