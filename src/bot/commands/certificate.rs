//! Certificate commands - list, create, edit, delete and issue certificates.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{
                autocomplete,
                lookup::{download, find_certificate, find_member},
                session::require_session,
            },
            render::list_reply,
        },
        core::{assignment, certificate},
        errors::{Error, Result},
        presenter::ListView,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Parent command for managing certificates.
    #[poise::command(
        slash_command,
        check = "require_session",
        subcommands(
            "certificate_list",
            "certificate_create",
            "certificate_edit",
            "certificate_delete",
            "certificate_issue"
        )
    )]
    pub async fn certificates(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Certificate management. Available subcommands:\n\
            `/certificates list [search]` - List certificates\n\
            `/certificates create` - Create a certificate\n\
            `/certificates edit` - Edit a certificate\n\
            `/certificates delete` - Delete a certificate\n\
            `/certificates issue` - Issue a certificate to a member";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Lists certificates, optionally filtered by name or description.
    #[poise::command(slash_command, rename = "list", check = "require_session")]
    pub async fn certificate_list(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Search by name or description"] search: Option<String>,
    ) -> Result<()> {
        let snapshot = ctx.data().certificates().await;
        let query = search.unwrap_or_default();
        let view = ListView::from_snapshot(&snapshot, &query);
        let reply = list_reply("📜 Certificates", "certificates", &view, |c| {
            let mut value = c.description.clone();
            if !c.image_url.is_empty() {
                let _ = write!(value, "\n[Image]({})", c.image_url);
            }
            if !c.template_url.is_empty() {
                let _ = write!(value, "\n[Template]({})", c.template_url);
            }
            (c.name.clone(), value)
        });
        ctx.send(reply).await?;
        Ok(())
    }

    /// Creates a certificate with an optional image and template.
    #[poise::command(slash_command, rename = "create", check = "require_session")]
    pub async fn certificate_create(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Certificate name"] name: String,
        #[description = "What the certificate is for"] description: String,
        #[description = "Certificate image (optional)"] image: Option<serenity::Attachment>,
        #[description = "Printable template (optional)"] template: Option<serenity::Attachment>,
    ) -> Result<()> {
        ctx.defer().await?;
        let data = ctx.data();

        let mut form = certificate::new_form();
        form.set("name", name);
        form.set("description", description);
        let image = download(image).await?;
        let template = download(template).await?;
        let saved_name =
            certificate::save_certificate(&data.gateway, &mut form, image, template).await?;
        data.refresh_certificates().await;

        ctx.say(format!("✅ Created certificate **{saved_name}**."))
            .await?;
        Ok(())
    }

    /// Edits a certificate; fields and files left out stay as they are.
    #[poise::command(slash_command, rename = "edit", check = "require_session")]
    pub async fn certificate_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Certificate to edit"]
        #[autocomplete = "autocomplete::autocomplete_certificate"]
        certificate: String,
        #[description = "New name"] name: Option<String>,
        #[description = "New description"] description: Option<String>,
        #[description = "New image"] image: Option<serenity::Attachment>,
        #[description = "New template"] template: Option<serenity::Attachment>,
    ) -> Result<()> {
        ctx.defer().await?;
        let data = ctx.data();
        let existing = find_certificate(data, &certificate).await?;

        let mut form = certificate::edit_form(&existing);
        form.set_if_some("name", name);
        form.set_if_some("description", description);
        let image = download(image).await?;
        let template = download(template).await?;
        let saved_name =
            certificate::save_certificate(&data.gateway, &mut form, image, template).await?;
        data.refresh_certificates().await;

        ctx.say(format!("✅ Updated certificate **{saved_name}**."))
            .await?;
        Ok(())
    }

    /// Deletes a certificate and every issued copy of it.
    #[poise::command(slash_command, rename = "delete", check = "require_session")]
    pub async fn certificate_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Certificate to delete"]
        #[autocomplete = "autocomplete::autocomplete_certificate"]
        certificate: String,
    ) -> Result<()> {
        let data = ctx.data();
        let existing = find_certificate(data, &certificate).await?;
        certificate::delete_certificate(&data.gateway, existing.id).await?;
        data.refresh_certificates().await;

        ctx.say(format!("🗑️ Deleted certificate **{}**.", existing.name))
            .await?;
        Ok(())
    }

    /// Issues a certificate to a member.
    #[poise::command(slash_command, rename = "issue", check = "require_session")]
    pub async fn certificate_issue(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Certificate to issue"]
        #[autocomplete = "autocomplete::autocomplete_certificate"]
        certificate: String,
        #[description = "Member receiving the certificate"]
        #[autocomplete = "autocomplete::autocomplete_member"]
        member: String,
        #[description = "Certificate number (optional)"] number: Option<String>,
        #[description = "Notes (optional)"] notes: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let cert = find_certificate(data, &certificate).await?;
        let member = find_member(data, &member).await?;

        assignment::issue_certificate(&data.gateway, Some(cert.id), Some(member.id), number, notes)
            .await?;
        ctx.say(format!(
            "📜 Issued **{}** to **{}**.",
            cert.name, member.full_name
        ))
        .await?;
        Ok(())
    }
}

pub use inner::*;
