//! Remote data gateway - the only module that talks to the backend.
//!
//! [`Gateway`] exposes generic fetch/insert/update/delete over any
//! [`Collection`], plus file upload into storage buckets. Records crossing
//! this boundary are typed `sea-orm` models, so a row that does not match the
//! schema fails here instead of deep inside a command.
//!
//! Multi-call operations built on top of the gateway are not transactional:
//! a failed call never rolls back the calls that preceded it.

use crate::{
    entities::{
        Badge, Certificate, PointsTransaction, Program, Task, Trip, User, UserBadge,
        UserCertificate, badge, certificate, points_transaction, points_transaction::NewPointsTransaction,
        program, task, trip, user, user_badge, user_certificate,
    },
    errors::{Error, Result},
    storage::{Bucket, BucketStore},
};
use sea_orm::{
    Condition, DatabaseConnection, IntoActiveModel, Order, QueryOrder, TransactionTrait, prelude::*,
    sea_query::{Expr, IntoCondition},
};
use std::future::Future;
use tracing::{debug, error, instrument};

/// A backend collection: an entity with a stable name and an `i64` id column.
pub trait Collection:
    EntityTrait<Model: Sync + IntoActiveModel<Self::ActiveModel>, ActiveModel: Send + Sync>
{
    /// Collection name as known to the backend
    const NAME: &'static str;

    /// Primary key column
    fn id_column() -> Self::Column;
}

/// Filter and ordering for a [`Gateway::fetch`].
#[derive(Debug)]
pub struct Query<E: Collection> {
    condition: Condition,
    order: Option<(E::Column, Order)>,
}

impl<E: Collection> Query<E> {
    /// Every record, in backend order.
    #[must_use]
    pub fn all() -> Self {
        Self {
            condition: Condition::all(),
            order: None,
        }
    }

    /// Adds a column-level filter; filters are combined with AND.
    #[must_use]
    pub fn filter(mut self, condition: impl IntoCondition) -> Self {
        self.condition = self.condition.add(condition.into_condition());
        self
    }

    /// Orders the result by one column.
    #[must_use]
    pub fn order_by(mut self, column: E::Column, order: Order) -> Self {
        self.order = Some((column, order));
        self
    }
}

/// Request/response access to the backend's collections and buckets.
pub trait Gateway: Send + Sync {
    /// Reads every record of `E` matching the query.
    fn fetch<E: Collection>(
        &self,
        query: Query<E>,
    ) -> impl Future<Output = Result<Vec<E::Model>>> + Send;

    /// Inserts the records in one request.
    fn insert<E: Collection>(
        &self,
        records: Vec<E::ActiveModel>,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Applies the set fields of `patch` to the record with `id`.
    fn update<E: Collection>(
        &self,
        id: i64,
        patch: E::ActiveModel,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Deletes the record with `id`.
    fn delete<E: Collection>(&self, id: i64) -> impl Future<Output = Result<()>> + Send;

    /// Stores a file and returns its public URL.
    fn upload_file(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Records the transactions and increments each user's points in a single
    /// atomic backend operation.
    fn apply_points(
        &self,
        entries: Vec<NewPointsTransaction>,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Reads one record by id, failing with [`Error::NotFound`] when absent.
pub async fn fetch_by_id<G: Gateway, E: Collection>(gateway: &G, id: i64) -> Result<E::Model> {
    gateway
        .fetch::<E>(Query::all().filter(E::id_column().eq(id)))
        .await?
        .into_iter()
        .next()
        .ok_or(Error::NotFound {
            collection: E::NAME,
            id,
        })
}

/// [`Gateway`] over a `sea-orm` connection and a [`BucketStore`].
#[derive(Debug)]
pub struct DbGateway {
    db: DatabaseConnection,
    store: BucketStore,
}

impl DbGateway {
    /// Wraps an open connection and a bucket store.
    #[must_use]
    pub const fn new(db: DatabaseConnection, store: BucketStore) -> Self {
        Self { db, store }
    }

    /// Underlying connection
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Underlying bucket store
    #[must_use]
    pub const fn store(&self) -> &BucketStore {
        &self.store
    }
}

impl Gateway for DbGateway {
    #[instrument(skip(self, query), fields(collection = E::NAME))]
    async fn fetch<E: Collection>(&self, query: Query<E>) -> Result<Vec<E::Model>> {
        let mut select = E::find().filter(query.condition);
        if let Some((column, order)) = query.order {
            select = select.order_by(column, order);
        }
        let rows = select
            .all(&self.db)
            .await
            .inspect_err(|e| error!("Fetch from {} failed: {}", E::NAME, e))?;
        debug!("Fetched {} rows from {}", rows.len(), E::NAME);
        Ok(rows)
    }

    #[instrument(skip(self, records), fields(collection = E::NAME, count = records.len()))]
    async fn insert<E: Collection>(&self, records: Vec<E::ActiveModel>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        E::insert_many(records)
            .exec_without_returning(&self.db)
            .await
            .inspect_err(|e| error!("Insert into {} failed: {}", E::NAME, e))?;
        Ok(())
    }

    #[instrument(skip(self, patch), fields(collection = E::NAME))]
    async fn update<E: Collection>(&self, id: i64, patch: E::ActiveModel) -> Result<()> {
        let result = E::update_many()
            .set(patch)
            .filter(E::id_column().eq(id))
            .exec(&self.db)
            .await
            .inspect_err(|e| error!("Update of {} {} failed: {}", E::NAME, id, e))?;
        if result.rows_affected == 0 {
            return Err(Error::NotFound {
                collection: E::NAME,
                id,
            });
        }
        Ok(())
    }

    #[instrument(skip(self), fields(collection = E::NAME))]
    async fn delete<E: Collection>(&self, id: i64) -> Result<()> {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(&self.db)
            .await
            .inspect_err(|e| error!("Delete of {} {} failed: {}", E::NAME, id, e))?;
        if result.rows_affected == 0 {
            return Err(Error::NotFound {
                collection: E::NAME,
                id,
            });
        }
        Ok(())
    }

    async fn upload_file(&self, bucket: Bucket, path: &str, bytes: Vec<u8>) -> Result<String> {
        self.store.upload(bucket, path, &bytes).await
    }

    #[instrument(skip(self, entries), fields(count = entries.len()))]
    async fn apply_points(&self, entries: Vec<NewPointsTransaction>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let txn = self.db.begin().await?;
        let now = chrono::Utc::now();

        let rows: Vec<points_transaction::ActiveModel> = entries
            .iter()
            .cloned()
            .map(|entry| entry.into_active_model(now))
            .collect();
        PointsTransaction::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;

        for entry in &entries {
            let current = User::find_by_id(entry.user_id)
                .one(&txn)
                .await?
                .ok_or(Error::NotFound {
                    collection: User::NAME,
                    id: entry.user_id,
                })?;
            if current.points + entry.points < 0 {
                return Err(Error::InvalidPoints {
                    current: current.points,
                    delta: entry.points,
                });
            }
            User::update_many()
                .col_expr(
                    user::Column::Points,
                    Expr::col(user::Column::Points).add(entry.points),
                )
                .filter(user::Column::Id.eq(entry.user_id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        debug!("Applied {} points transactions atomically", entries.len());
        Ok(())
    }
}

impl Collection for User {
    const NAME: &'static str = "users";
    fn id_column() -> Self::Column {
        user::Column::Id
    }
}

impl Collection for Badge {
    const NAME: &'static str = "badges";
    fn id_column() -> Self::Column {
        badge::Column::Id
    }
}

impl Collection for Certificate {
    const NAME: &'static str = "certificates";
    fn id_column() -> Self::Column {
        certificate::Column::Id
    }
}

impl Collection for UserBadge {
    const NAME: &'static str = "user_badges";
    fn id_column() -> Self::Column {
        user_badge::Column::Id
    }
}

impl Collection for UserCertificate {
    const NAME: &'static str = "user_certificates";
    fn id_column() -> Self::Column {
        user_certificate::Column::Id
    }
}

impl Collection for PointsTransaction {
    const NAME: &'static str = "points_transactions";
    fn id_column() -> Self::Column {
        points_transaction::Column::Id
    }
}

impl Collection for Trip {
    const NAME: &'static str = "trips";
    fn id_column() -> Self::Column {
        trip::Column::Id
    }
}

impl Collection for Task {
    const NAME: &'static str = "tasks";
    fn id_column() -> Self::Column {
        task::Column::Id
    }
}

impl Collection for Program {
    const NAME: &'static str = "programs";
    fn id_column() -> Self::Column {
        program::Column::Id
    }
}
