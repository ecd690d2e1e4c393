//! Database bootstrap for the quotation engine.
//!
//! This module handles `SQLite` connection and schema creation using `SeaORM`.
//! The schema is generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the database always matches the
//! Rust struct definitions. Migration runs as one explicit deployment step
//! (see the `cotizador` binary), never implicitly inside engine operations.

use crate::entities::{Attachment, Client, LineItem, Product, Quotation, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/cotizador.sqlite?mode=rwc".to_string())
}

/// Establishes a connection using the `DATABASE_URL` environment variable,
/// falling back to a default local `SQLite` file.
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all tables from the entity definitions.
///
/// Uniqueness constraints (quotation number, approval token, product code,
/// username) and foreign keys (cascade for line items and attachments,
/// set-null for the product and creator references) come from the entity
/// annotations. Idempotent: existing tables are left alone.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = [
        schema.create_table_from_entity(Client),
        schema.create_table_from_entity(User),
        schema.create_table_from_entity(Product),
        schema.create_table_from_entity(Quotation),
        schema.create_table_from_entity(LineItem),
        schema.create_table_from_entity(Attachment),
    ];

    for statement in &mut statements {
        db.execute(builder.build(statement.if_not_exists())).await?;
    }

    Ok(())
}

/// Runs the full migration step: table creation plus the default admin seed.
pub async fn run_migrations(db: &DatabaseConnection) -> Result<()> {
    create_tables(db).await?;
    let seeded = crate::core::user::seed_default_admin(db).await?;
    if seeded {
        tracing::info!("seeded default admin account");
    }
    Ok(())
}
