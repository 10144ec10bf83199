//! Shared test utilities for scout-hub.
//!
//! This module provides common helper functions for setting up test databases
//! and gateways and creating test records with sensible defaults.

use crate::{
    entities::{
        Badge, Certificate, Role, User, badge, certificate,
        points_transaction::NewPointsTransaction, user,
    },
    errors::{Error, Result},
    gateway::{Collection, DbGateway, Gateway, Query},
    storage::{Bucket, BucketStore},
};
use sea_orm::{ColumnTrait, DatabaseConnection, Set};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Routes `tracing` output through the test harness; repeated calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Bucket store in a fresh temporary directory, served from
/// `http://localhost/storage`.
pub fn temp_store(name: &str) -> BucketStore {
    let root = std::env::temp_dir()
        .join("scout-hub-tests")
        .join(format!("{name}-{}", uuid::Uuid::new_v4()));
    BucketStore::new(root, "http://localhost/storage")
}

/// Gateway over an in-memory database and a temporary bucket store.
pub async fn setup_test_gateway(name: &str) -> Result<DbGateway> {
    Ok(DbGateway::new(setup_test_db().await?, temp_store(name)))
}

/// Creates a test user with sensible defaults.
///
/// # Defaults
/// * `national_id`: `"NID-"` followed by `auth_id`
/// * `role`: scout
/// * `points`: 0
pub async fn create_test_user<G: Gateway>(
    gateway: &G,
    auth_id: &str,
    full_name: &str,
) -> Result<user::Model> {
    create_custom_user(gateway, auth_id, full_name, Role::Scout, 0).await
}

/// Creates a test user with a specific role and starting balance.
pub async fn create_custom_user<G: Gateway>(
    gateway: &G,
    auth_id: &str,
    full_name: &str,
    role: Role,
    points: i32,
) -> Result<user::Model> {
    let record = user::ActiveModel {
        auth_id: Set(auth_id.to_string()),
        national_id: Set(format!("NID-{auth_id}")),
        full_name: Set(full_name.to_string()),
        role: Set(role),
        points: Set(points),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    gateway.insert::<User>(vec![record]).await?;
    gateway
        .fetch::<User>(Query::all().filter(user::Column::AuthId.eq(auth_id)))
        .await?
        .into_iter()
        .next()
        .ok_or(Error::Database(format!("test user {auth_id} was not stored")))
}

/// Creates a test badge without an image.
pub async fn create_test_badge<G: Gateway>(
    gateway: &G,
    name: &str,
    description: &str,
) -> Result<badge::Model> {
    let record = badge::ActiveModel {
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        image_url: Set(String::new()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    gateway.insert::<Badge>(vec![record]).await?;
    gateway
        .fetch::<Badge>(Query::all().filter(badge::Column::Name.eq(name)))
        .await?
        .pop()
        .ok_or(Error::Database(format!("test badge {name} was not stored")))
}

/// Creates a test certificate without image or template.
pub async fn create_test_certificate<G: Gateway>(
    gateway: &G,
    name: &str,
    description: &str,
) -> Result<certificate::Model> {
    let record = certificate::ActiveModel {
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        image_url: Set(String::new()),
        template_url: Set(String::new()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    gateway.insert::<Certificate>(vec![record]).await?;
    gateway
        .fetch::<Certificate>(Query::all().filter(certificate::Column::Name.eq(name)))
        .await?
        .pop()
        .ok_or(Error::Database(format!("test certificate {name} was not stored")))
}

/// Gateway that behaves like the wrapped [`DbGateway`] except that its
/// `fail_on`-th `update` call (1-based) fails without touching the backend.
pub struct FlakyGateway {
    inner: DbGateway,
    fail_on: usize,
    updates: AtomicUsize,
}

impl FlakyGateway {
    pub const fn new(inner: DbGateway, fail_on: usize) -> Self {
        Self {
            inner,
            fail_on,
            updates: AtomicUsize::new(0),
        }
    }

    pub const fn inner(&self) -> &DbGateway {
        &self.inner
    }
}

impl Gateway for FlakyGateway {
    async fn fetch<E: Collection>(&self, query: Query<E>) -> Result<Vec<E::Model>> {
        self.inner.fetch(query).await
    }

    async fn insert<E: Collection>(&self, records: Vec<E::ActiveModel>) -> Result<()> {
        self.inner.insert::<E>(records).await
    }

    async fn update<E: Collection>(&self, id: i64, patch: E::ActiveModel) -> Result<()> {
        let call = self.updates.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(Error::Database("connection reset by peer".to_string()));
        }
        self.inner.update::<E>(id, patch).await
    }

    async fn delete<E: Collection>(&self, id: i64) -> Result<()> {
        self.inner.delete::<E>(id).await
    }

    async fn upload_file(&self, bucket: Bucket, path: &str, bytes: Vec<u8>) -> Result<String> {
        self.inner.upload_file(bucket, path, bytes).await
    }

    async fn apply_points(&self, entries: Vec<NewPointsTransaction>) -> Result<()> {
        self.inner.apply_points(entries).await
    }
}
