//! Badge business logic - list, create, edit and delete badges.
//!
//! Saving goes through the form controller: required fields are checked
//! before anything is uploaded, and a new image replaces the stored URL only
//! when one was provided.

use crate::{
    entities::{Badge, badge},
    errors::{Error, Result},
    form::{FormMode, FormRecord, FormState, FormValues},
    gateway::{Gateway, Query},
    storage::{Bucket, random_object_name},
};
use sea_orm::{Order, Set};
use tracing::info;

/// Fields a badge form must have filled in
pub const REQUIRED_FIELDS: &[&str] = &["name", "description"];

/// A file picked for upload.
#[derive(Clone, Debug)]
pub struct Upload {
    /// Original file name, used for the extension
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FormRecord for badge::Model {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("image_url", self.image_url.clone()),
        ]
    }
}

/// Fails with a validation error when another record in `existing` already
/// uses `name`, ignoring case. The record being edited is not compared with
/// itself.
pub(crate) fn ensure_unique_name<'a>(
    existing: impl IntoIterator<Item = (i64, &'a str)>,
    name: &str,
    mode: FormMode,
    noun: &str,
) -> Result<()> {
    let own_id = match mode {
        FormMode::Create => None,
        FormMode::Edit { id } => Some(id),
    };
    let wanted = name.trim().to_lowercase();
    let taken = existing
        .into_iter()
        .any(|(id, other)| Some(id) != own_id && other.trim().to_lowercase() == wanted);
    if taken {
        Err(Error::validation(format!(
            "A {noun} named \"{}\" already exists",
            name.trim()
        )))
    } else {
        Ok(())
    }
}

/// Empty form for a new badge.
#[must_use]
pub const fn new_form() -> FormState {
    FormState::new(REQUIRED_FIELDS)
}

/// Form seeded from an existing badge.
#[must_use]
pub fn edit_form(existing: &badge::Model) -> FormState {
    FormState::editing(REQUIRED_FIELDS, existing)
}

/// All badges, newest first.
pub async fn list_badges<G: Gateway>(gateway: &G) -> Result<Vec<badge::Model>> {
    gateway
        .fetch::<Badge>(Query::all().order_by(badge::Column::CreatedAt, Order::Desc))
        .await
}

/// Validates the form, uploads `image` if given, then inserts or updates.
///
/// Returns the stored name. Badge names are unique, ignoring case. If the
/// write fails after the upload succeeded, the uploaded file stays
/// in storage unreferenced.
pub async fn save_badge<G: Gateway>(
    gateway: &G,
    form: &mut FormState,
    image: Option<Upload>,
) -> Result<String> {
    form.submit(|values: FormValues| async move {
        let existing = list_badges(gateway).await?;
        ensure_unique_name(
            existing.iter().map(|b| (b.id, b.name.as_str())),
            values.get("name"),
            values.mode(),
            "badge",
        )?;

        let image_url = match image {
            Some(upload) => {
                let path = random_object_name("badges", &upload.file_name);
                gateway.upload_file(Bucket::Badges, &path, upload.bytes).await?
            }
            None => values.get("image_url").to_string(),
        };

        let record = badge::ActiveModel {
            name: Set(values.get("name").to_string()),
            description: Set(values.get("description").to_string()),
            image_url: Set(image_url),
            ..Default::default()
        };

        match values.mode() {
            FormMode::Create => {
                let record = badge::ActiveModel {
                    created_at: Set(chrono::Utc::now()),
                    ..record
                };
                gateway.insert::<Badge>(vec![record]).await?;
                info!("Created badge '{}'", values.get("name"));
            }
            FormMode::Edit { id } => {
                gateway.update::<Badge>(id, record).await?;
                info!("Updated badge {}", id);
            }
        }
        Ok(values.get("name").to_string())
    })
    .await
}

/// Deletes a badge; its awards go with it.
pub async fn delete_badge<G: Gateway>(gateway: &G, badge_id: i64) -> Result<()> {
    gateway.delete::<Badge>(badge_id).await?;
    info!("Deleted badge {}", badge_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_badge_without_image() -> Result<()> {
        let gw = setup_test_gateway("badge-create").await?;

        let mut form = new_form();
        form.set("name", "X");
        form.set("description", "Y");
        save_badge(&gw, &mut form, None).await?;

        let badges = list_badges(&gw).await?;
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].name, "X");
        assert_eq!(badges[0].description, "Y");
        assert_eq!(badges[0].image_url, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_create_badge_requires_name_and_description() -> Result<()> {
        let gw = setup_test_gateway("badge-required").await?;

        let mut form = new_form();
        form.set("name", "Only a name");
        let result = save_badge(&gw, &mut form, None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert!(list_badges(&gw).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_badge_with_image_stores_url() -> Result<()> {
        let gw = setup_test_gateway("badge-image").await?;

        let mut form = new_form();
        form.set("name", "Knots");
        form.set("description", "Ten knots");
        let upload = Upload {
            file_name: "knot.png".to_string(),
            bytes: b"png".to_vec(),
        };
        save_badge(&gw, &mut form, Some(upload)).await?;

        let badge = &list_badges(&gw).await?[0];
        assert!(badge.image_url.starts_with("http://localhost/storage/badges/badges/"));
        assert!(badge.image_url.ends_with(".png"));
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_name_keeps_image_url() -> Result<()> {
        let gw = setup_test_gateway("badge-edit").await?;

        let mut form = new_form();
        form.set("name", "Knots");
        form.set("description", "Ten knots");
        let upload = Upload {
            file_name: "knot.png".to_string(),
            bytes: b"png".to_vec(),
        };
        save_badge(&gw, &mut form, Some(upload)).await?;
        let original = list_badges(&gw).await?.remove(0);

        let mut form = edit_form(&original);
        form.set("name", "Rope work");
        assert_eq!(save_badge(&gw, &mut form, None).await?, "Rope work");

        let badges = list_badges(&gw).await?;
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].name, "Rope work");
        assert_eq!(badges[0].description, "Ten knots");
        assert_eq!(badges[0].image_url, original.image_url);
        assert_eq!(badges[0].created_at, original.created_at);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_badge() -> Result<()> {
        let gw = setup_test_gateway("badge-delete").await?;
        let badge = create_test_badge(&gw, "Knots", "Ten knots").await?;

        delete_badge(&gw, badge.id).await?;
        assert!(list_badges(&gw).await?.is_empty());
        assert!(matches!(
            delete_badge(&gw, badge.id).await,
            Err(Error::NotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_badge_names_rejected() -> Result<()> {
        let gw = setup_test_gateway("badge-unique").await?;
        create_test_badge(&gw, "Knots", "Ten knots").await?;
        let hiking = create_test_badge(&gw, "Hiking", "Twenty kilometres").await?;

        let mut form = new_form();
        form.set("name", " knots ");
        form.set("description", "Another knots badge");
        let result = save_badge(&gw, &mut form, None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        assert_eq!(form.values().get("name"), "knots");

        let mut rename = edit_form(&hiking);
        rename.set("name", "KNOTS");
        let result = save_badge(&gw, &mut rename, None).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        // Changing only the case of its own name is fine.
        let mut recase = edit_form(&hiking);
        recase.set("name", "hiking");
        save_badge(&gw, &mut recase, None).await?;

        let names: Vec<String> = list_badges(&gw).await?.into_iter().map(|b| b.name).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"hiking".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_update_after_upload_keeps_record_and_draft() -> Result<()> {
        let gw = FlakyGateway::new(setup_test_gateway("badge-flaky").await?, 1);
        let original = create_test_badge(gw.inner(), "Knots", "Ten knots").await?;

        let mut form = edit_form(&original);
        form.set("description", "Twelve knots");
        let upload = Upload {
            file_name: "knot.png".to_string(),
            bytes: b"png".to_vec(),
        };
        let result = save_badge(&gw, &mut form, Some(upload)).await;
        assert!(matches!(result, Err(Error::Database(_))));

        let stored = list_badges(&gw).await?.remove(0);
        assert_eq!(stored.image_url, original.image_url);
        assert_eq!(stored.description, "Ten knots");

        // The uploaded file stays behind, unreferenced.
        let folder = gw.inner().store().root().join("badges").join("badges");
        assert_eq!(std::fs::read_dir(&folder).unwrap().count(), 1);

        assert_eq!(form.values().get("description"), "Twelve knots");
        assert_eq!(form.values().mode(), FormMode::Edit { id: original.id });

        // Retrying with the same draft succeeds.
        save_badge(&gw, &mut form, None).await?;
        assert_eq!(list_badges(&gw).await?[0].description, "Twelve knots");
        Ok(())
    }
}
