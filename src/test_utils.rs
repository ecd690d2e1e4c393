//! Shared test utilities for `Cotizador`.
//!
//! This module provides common helper functions for setting up test
//! databases and creating test entities with sensible defaults.

use crate::{
    config::settings::AppConfig,
    core::{
        client::{self, ClientDraft},
        product::{self, ProductDraft},
        quotation::{self, LineItemInput, QuotationDraft},
        user::{self, UserDraft},
    },
    entities::{self, ProductKind, Role},
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// The default application configuration used in tests.
#[must_use]
pub fn test_config() -> AppConfig {
    AppConfig::default()
}

/// The reference two-line item set: 2 x 100.00 plus 1 x 50.00.
#[must_use]
pub fn test_items() -> Vec<LineItemInput> {
    vec![
        LineItemInput {
            product_id: None,
            concept: "Desarrollo de sitio".to_string(),
            description: Some("Fase inicial".to_string()),
            quantity: 2,
            unit_price: Decimal::from(100),
        },
        LineItemInput {
            product_id: None,
            concept: "Hospedaje anual".to_string(),
            description: None,
            quantity: 1,
            unit_price: Decimal::from(50),
        },
    ]
}

/// Creates a test client with sensible defaults.
/// The email is derived from the name, lowercased, at `cliente.mx`.
pub async fn create_test_client(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::client::Model> {
    client::create_client(
        db,
        ClientDraft {
            name: name.to_string(),
            email: format!("{}@cliente.mx", name.to_lowercase()),
            ..Default::default()
        },
    )
    .await
}

/// Creates a test staff account; the username is the display name
/// lowercased with underscores.
pub async fn create_test_user(
    db: &DatabaseConnection,
    full_name: &str,
) -> Result<entities::user::Model> {
    user::create_user(
        db,
        UserDraft {
            username: full_name.to_lowercase().replace(' ', "_"),
            password: "prueba123".to_string(),
            full_name: full_name.to_string(),
            email: format!("{}@example.com", full_name.to_lowercase().replace(' ', ".")),
            role: Role::User,
        },
    )
    .await
}

/// Creates a test catalog product with the given code.
///
/// # Defaults
/// * name: `Producto <code>`
/// * kind: service, price 150.00, no category
pub async fn create_test_product(
    db: &DatabaseConnection,
    code: &str,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        ProductDraft {
            code: code.to_string(),
            name: format!("Producto {code}"),
            description: None,
            kind: ProductKind::Service,
            unit_price: Decimal::from(150),
            unit: None,
            category: None,
            image_url: None,
        },
    )
    .await
}

/// Creates a test quotation for `client_id` from the reference item set.
/// Returns (id, number) like the aggregate service does.
pub async fn create_test_quotation(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<(i64, String)> {
    quotation::create_quotation(
        db,
        &test_config(),
        QuotationDraft {
            client_id,
            items: test_items(),
            ..Default::default()
        },
    )
    .await
}
