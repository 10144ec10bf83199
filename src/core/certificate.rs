//! Certificate business logic - list, create, edit and delete certificates.
//!
//! A certificate carries two optional files: a display image and a printable
//! template. Each is uploaded to the certificates bucket under its own folder
//! with a timestamped name.

use crate::{
    core::badge::{Upload, ensure_unique_name},
    entities::{Certificate, certificate},
    errors::Result,
    form::{FormMode, FormRecord, FormState, FormValues},
    gateway::{Gateway, Query},
    storage::{Bucket, timestamped_object_name},
};
use sea_orm::{Order, Set};
use tracing::{info, warn};

/// Fields a certificate form must have filled in
pub const REQUIRED_FIELDS: &[&str] = &["name", "description"];

const IMAGE_FOLDER: &str = "certificate-images";
const TEMPLATE_FOLDER: &str = "certificate-templates";

impl FormRecord for certificate::Model {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("description", self.description.clone()),
            ("image_url", self.image_url.clone()),
            ("template_url", self.template_url.clone()),
        ]
    }
}

/// Empty form for a new certificate.
#[must_use]
pub const fn new_form() -> FormState {
    FormState::new(REQUIRED_FIELDS)
}

/// Form seeded from an existing certificate.
#[must_use]
pub fn edit_form(existing: &certificate::Model) -> FormState {
    FormState::editing(REQUIRED_FIELDS, existing)
}

/// All certificates, newest first.
pub async fn list_certificates<G: Gateway>(gateway: &G) -> Result<Vec<certificate::Model>> {
    gateway
        .fetch::<Certificate>(Query::all().order_by(certificate::Column::CreatedAt, Order::Desc))
        .await
}

async fn upload_or_keep<G: Gateway>(
    gateway: &G,
    folder: &str,
    upload: Option<Upload>,
    current: &str,
) -> Result<String> {
    match upload {
        Some(upload) => {
            let path = timestamped_object_name(folder, &upload.file_name);
            gateway.upload_file(Bucket::Certificates, &path, upload.bytes).await
        }
        None => Ok(current.to_string()),
    }
}

/// Validates the form, uploads whichever files were given, then inserts or
/// updates.
///
/// Returns the stored name. Certificate names are unique, ignoring case. The image is uploaded
/// before the template. If the template upload or the
/// write fails, files already uploaded stay in storage unreferenced.
pub async fn save_certificate<G: Gateway>(
    gateway: &G,
    form: &mut FormState,
    image: Option<Upload>,
    template: Option<Upload>,
) -> Result<String> {
    form.submit(|values: FormValues| async move {
        let existing = list_certificates(gateway).await?;
        ensure_unique_name(
            existing.iter().map(|c| (c.id, c.name.as_str())),
            values.get("name"),
            values.mode(),
            "certificate",
        )?;

        let had_image = image.is_some();
        let image_url = upload_or_keep(gateway, IMAGE_FOLDER, image, values.get("image_url")).await?;
        let template_url =
            upload_or_keep(gateway, TEMPLATE_FOLDER, template, values.get("template_url"))
                .await
                .inspect_err(|e| {
                    if had_image {
                        warn!("Template upload failed after image was stored at {}: {}", image_url, e);
                    }
                })?;

        let record = certificate::ActiveModel {
            name: Set(values.get("name").to_string()),
            description: Set(values.get("description").to_string()),
            image_url: Set(image_url),
            template_url: Set(template_url),
            ..Default::default()
        };

        match values.mode() {
            FormMode::Create => {
                let record = certificate::ActiveModel {
                    created_at: Set(chrono::Utc::now()),
                    ..record
                };
                gateway.insert::<Certificate>(vec![record]).await?;
                info!("Created certificate '{}'", values.get("name"));
            }
            FormMode::Edit { id } => {
                gateway.update::<Certificate>(id, record).await?;
                info!("Updated certificate {}", id);
            }
        }
        Ok(values.get("name").to_string())
    })
    .await
}

/// Deletes a certificate; its issued copies go with it.
pub async fn delete_certificate<G: Gateway>(gateway: &G, certificate_id: i64) -> Result<()> {
    gateway.delete::<Certificate>(certificate_id).await?;
    info!("Deleted certificate {}", certificate_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::*;

    fn upload(name: &str) -> Upload {
        Upload {
            file_name: name.to_string(),
            bytes: b"file".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_create_certificate_with_both_files() -> Result<()> {
        let gw = setup_test_gateway("cert-files").await?;

        let mut form = new_form();
        form.set("name", "First aid");
        form.set("description", "Basic first aid course");
        save_certificate(&gw, &mut form, Some(upload("front.png")), Some(upload("print.pdf")))
            .await?;

        let certs = list_certificates(&gw).await?;
        assert_eq!(certs.len(), 1);
        assert!(
            certs[0]
                .image_url
                .starts_with("http://localhost/storage/certificates/certificate-images/")
        );
        assert!(
            certs[0]
                .template_url
                .starts_with("http://localhost/storage/certificates/certificate-templates/")
        );
        assert!(certs[0].template_url.ends_with(".pdf"));
        assert_eq!(form.values().get("name"), "");
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_fields_upload_nothing() -> Result<()> {
        let gw = setup_test_gateway("cert-invalid").await?;

        let mut form = new_form();
        form.set("description", "No name");
        let result = save_certificate(&gw, &mut form, Some(upload("front.png")), None).await;

        assert!(matches!(result, Err(Error::Validation { .. })));
        assert!(!gw.store().root().join("certificates").exists());
        assert!(list_certificates(&gw).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_replaces_only_given_file() -> Result<()> {
        let gw = setup_test_gateway("cert-edit").await?;

        let mut form = new_form();
        form.set("name", "First aid");
        form.set("description", "Basic first aid course");
        save_certificate(&gw, &mut form, Some(upload("front.png")), Some(upload("print.pdf")))
            .await?;
        let original = list_certificates(&gw).await?.remove(0);

        let mut form = edit_form(&original);
        form.set("description", "Advanced first aid");
        save_certificate(&gw, &mut form, None, Some(upload("print-v2.docx"))).await?;

        let updated = list_certificates(&gw).await?.remove(0);
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.description, "Advanced first aid");
        assert_eq!(updated.image_url, original.image_url);
        assert_ne!(updated.template_url, original.template_url);
        assert!(updated.template_url.ends_with(".docx"));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_certificate_removes_issued_copies() -> Result<()> {
        let gw = setup_test_gateway("cert-delete").await?;
        let scout = create_test_user(&gw, "10", "Omar").await?;
        let cert = create_test_certificate(&gw, "First aid", "Basic").await?;
        crate::core::assignment::issue_certificate(&gw, Some(cert.id), Some(scout.id), None, None)
            .await?;

        delete_certificate(&gw, cert.id).await?;

        assert!(list_certificates(&gw).await?.is_empty());
        let issued = crate::core::assignment::certificates_for_user(&gw, scout.id).await?;
        assert!(issued.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_cached_list_reflects_delete_after_refetch() -> Result<()> {
        let gw = setup_test_gateway("cert-cache").await?;
        let cert = create_test_certificate(&gw, "First aid", "Basic").await?;
        create_test_certificate(&gw, "Leadership", "Senior scouts").await?;
        let cache = crate::query::QueryCache::new(std::time::Duration::from_secs(300));

        let before = cache.get("certificates", || list_certificates(&gw)).await;
        assert_eq!(before.data.unwrap().len(), 2);

        delete_certificate(&gw, cert.id).await?;
        assert_eq!(list_certificates(&gw).await?.len(), 1);

        let cached = cache.get("certificates", || list_certificates(&gw)).await;
        assert_eq!(cached.data.unwrap().len(), 2);

        let after = cache.refetch("certificates", || list_certificates(&gw)).await;
        let remaining = after.data.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Leadership");
        Ok(())
    }

    #[tokio::test]
    async fn test_rename_onto_existing_certificate_rejected() -> Result<()> {
        let gw = setup_test_gateway("cert-unique").await?;
        create_test_certificate(&gw, "First aid", "Basic").await?;
        let leadership = create_test_certificate(&gw, "Leadership", "Senior scouts").await?;

        let mut form = edit_form(&leadership);
        form.set("name", "first AID");
        let result = save_certificate(&gw, &mut form, Some(upload("front.png")), None).await;

        assert!(matches!(result, Err(Error::Validation { .. })));
        assert!(!gw.store().root().join("certificates").exists());
        let names: Vec<String> = list_certificates(&gw).await?.into_iter().map(|c| c.name).collect();
        assert!(names.contains(&"Leadership".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_update_keeps_old_files_and_draft() -> Result<()> {
        let gw = FlakyGateway::new(setup_test_gateway("cert-flaky").await?, 1);
        let original = create_test_certificate(gw.inner(), "First aid", "Basic").await?;

        let mut form = edit_form(&original);
        form.set("description", "Advanced first aid");
        let result = save_certificate(&gw, &mut form, Some(upload("front.png")), None).await;
        assert!(matches!(result, Err(Error::Database(_))));

        let stored = list_certificates(&gw).await?.remove(0);
        assert_eq!(stored.image_url, original.image_url);
        assert_eq!(stored.description, "Basic");

        let images = gw
            .inner()
            .store()
            .root()
            .join("certificates")
            .join("certificate-images");
        assert_eq!(std::fs::read_dir(&images).unwrap().count(), 1);
        assert_eq!(form.values().get("description"), "Advanced first aid");
        Ok(())
    }
}
