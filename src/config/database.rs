//! Database configuration module for scout-hub.
//!
//! This module handles the backend connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust
//! structs. The same code serves a local `SQLite` file and a hosted Postgres
//! database; `DATABASE_URL` decides which.

use crate::entities::{
    Badge, Certificate, PointsTransaction, Program, Task, Trip, User, UserBadge, UserCertificate,
};
use crate::errors::Result;
use sea_orm::{
    ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema, sea_query::TableCreateStatement,
};
use tracing::{debug, info, instrument};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/scout_hub.sqlite?mode=rwc";

/// Gets the database URL from the environment or returns the default `SQLite` path.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Opens a connection to the backend database at `database_url`.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    debug!("Connecting to backend database");
    Database::connect(database_url).await.map_err(Into::into)
}

fn table_for<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    statement
}

/// Creates every collection's table if it does not exist yet.
///
/// Tables are created parents first so foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let statements = [
        table_for(&schema, User),
        table_for(&schema, Badge),
        table_for(&schema, Certificate),
        table_for(&schema, PointsTransaction),
        table_for(&schema, UserBadge),
        table_for(&schema, UserCertificate),
        table_for(&schema, Trip),
        table_for(&schema, Task),
        table_for(&schema, Program),
    ];

    for statement in &statements {
        db.execute(builder.build(statement)).await?;
    }
    info!("Ensured {} tables exist", statements.len());

    Ok(())
}
