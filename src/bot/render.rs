//! Rendering helpers shared by the commands.

use crate::{errors::Error, presenter::ListView};
use poise::serenity_prelude as serenity;

/// Discord's limit on embed fields
pub const MAX_EMBED_FIELDS: usize = 25;

/// Discord's limit on an embed field name, in characters
pub const MAX_FIELD_NAME: usize = 256;

/// Discord's limit on an embed field value, in characters
pub const MAX_FIELD_VALUE: usize = 1024;

/// Discord's limit on all text in one embed, in characters
pub const MAX_EMBED_TEXT: usize = 6000;

// Kept free for the overflow footer.
const FOOTER_ALLOWANCE: usize = 120;

/// Embed accent color
pub const EMBED_COLOR: u32 = 0x0058_65F2;

/// Text shown instead of rows, or `None` when there are rows to show.
#[must_use]
pub fn list_status<T>(view: &ListView<'_, T>, noun: &str) -> Option<String> {
    match view {
        ListView::Loading => Some(format!("⏳ Loading {noun}...")),
        ListView::Failed(message) => Some(format!("❌ Could not load {noun}: {message}")),
        ListView::Empty => Some(format!("📭 No {noun} yet.")),
        ListView::NoResults { query } => Some(format!("🔍 No {noun} match \"{query}\".")),
        ListView::Rows(_) => None,
    }
}

/// Shortens `text` to at most `max` characters, marking the cut with `…`.
#[must_use]
pub fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

/// Clips each field to Discord's limits and keeps as many leading fields as
/// fit in one embed next to `title`.
#[must_use]
pub fn fit_fields(
    title: &str,
    fields: impl IntoIterator<Item = (String, String)>,
) -> Vec<(String, String)> {
    let mut budget = MAX_EMBED_TEXT.saturating_sub(title.chars().count() + FOOTER_ALLOWANCE);
    let mut fitted = Vec::new();
    for (name, value) in fields.into_iter().take(MAX_EMBED_FIELDS) {
        let name = clip(&non_empty(name), MAX_FIELD_NAME);
        let value = clip(&non_empty(value), MAX_FIELD_VALUE);
        let size = name.chars().count() + value.chars().count();
        if size > budget {
            break;
        }
        budget -= size;
        fitted.push((name, value));
    }
    fitted
}

/// Renders a list view as an embed with one field per row.
///
/// Rows are shown until [`MAX_EMBED_FIELDS`] or the embed's text limit is
/// reached; the footer says how many were left out.
pub fn list_reply<T>(
    title: &str,
    noun: &str,
    view: &ListView<'_, T>,
    field: impl Fn(&T) -> (String, String),
) -> poise::CreateReply {
    if let Some(status) = list_status(view, noun) {
        return poise::CreateReply::default().content(status);
    }
    let ListView::Rows(rows) = view else {
        return poise::CreateReply::default();
    };

    let title = clip(title, MAX_FIELD_NAME);
    let fields = fit_fields(&title, rows.iter().map(|row| field(row)));
    let shown = fields.len();

    let mut embed = serenity::CreateEmbed::default()
        .title(title)
        .color(EMBED_COLOR)
        .fields(fields.into_iter().map(|(name, value)| (name, value, false)));
    if shown < rows.len() {
        embed = embed.footer(serenity::CreateEmbedFooter::new(overflow_notice(
            shown,
            rows.len(),
            noun,
        )));
    }
    poise::CreateReply::default().embed(embed)
}

/// Footer for a list cut short.
#[must_use]
pub fn overflow_notice(shown: usize, total: usize, noun: &str) -> String {
    clip(
        &format!("Showing {shown} of {total} {noun}. Narrow the search to see more."),
        FOOTER_ALLOWANCE,
    )
}

/// Embed field values cannot be empty.
#[must_use]
pub fn non_empty(value: String) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value
    }
}

/// User-facing message for a failed command.
#[must_use]
pub fn error_message(error: &Error) -> String {
    match error {
        Error::Validation { message } => format!("❌ {message}"),
        Error::NotSignedIn | Error::AlreadyRegistered => format!("❌ {error}"),
        Error::PartialFailure { completed, total, .. } => format!(
            "⚠️ Only {} of {total} members were updated before an error. \
             The points history already lists everyone. Details: {error}",
            completed.len()
        ),
        _ => format!("❌ Something went wrong: {error}"),
    }
}
