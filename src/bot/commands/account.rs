//! Account commands - register, login and logout.
//!
//! The member's Discord id is their auth identity. Signing in publishes an
//! auth event that the session store picks up.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::user::{self, Registration},
        errors::{Error, Result},
    };
    use tracing::info;

    /// Creates your Scout Hub account and signs you in.
    #[poise::command(slash_command)]
    pub async fn register(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Your national id number"] national_id: String,
        #[description = "Your full name"] full_name: String,
        #[description = "Email address (optional)"] email: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let registration = Registration {
            auth_id: ctx.author().id.to_string(),
            national_id,
            full_name,
            email,
        };

        let member = user::register(&data.gateway, registration).await?;
        data.invalidate_users().await;
        let name = member.full_name.clone();
        data.auth.sign_in(member);

        ctx.say(format!("✅ Welcome, **{name}**! Your account is ready. Try `/dashboard`."))
            .await?;
        Ok(())
    }

    /// Signs you in with your Discord account.
    #[poise::command(slash_command)]
    pub async fn login(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let auth_id = ctx.author().id.to_string();

        let Some(member) = user::find_by_auth_id(&data.gateway, &auth_id).await? else {
            ctx.say("❌ No account found for you. Use `/register` first.")
                .await?;
            return Ok(());
        };

        info!("User {} signed in", member.id);
        let name = member.full_name.clone();
        data.auth.sign_in(member);
        ctx.say(format!("✅ Signed in as **{name}**.")).await?;
        Ok(())
    }

    /// Ends your session.
    #[poise::command(slash_command)]
    pub async fn logout(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let auth_id = ctx.author().id.to_string();
        ctx.data().auth.sign_out(&auth_id);
        ctx.say("👋 Signed out. Use `/start` to sign in again.")
            .await?;
        Ok(())
    }
}

pub use inner::*;
