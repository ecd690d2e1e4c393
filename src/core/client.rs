//! Client ledger operations.
//!
//! Clients are plain records: create, update, fetch, list. Quotations hold
//! a required reference to them, so there is no delete.

use crate::{
    entities::{Client, client},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Fields accepted when creating or updating a client.
#[derive(Debug, Clone, Default)]
pub struct ClientDraft {
    /// Business or contact name
    pub name: String,
    /// Primary contact email
    pub email: String,
    /// Contact phone number
    pub phone: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Fiscal identifier
    pub tax_id: Option<String>,
}

fn validate(draft: &ClientDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(Error::Validation {
            field: "name",
            message: "client name cannot be empty".to_string(),
        });
    }
    if draft.email.trim().is_empty() {
        return Err(Error::Validation {
            field: "email",
            message: "client email cannot be empty".to_string(),
        });
    }
    Ok(())
}

/// Creates a new client.
///
/// # Errors
/// Returns a validation error for a blank name or email.
pub async fn create_client(db: &DatabaseConnection, draft: ClientDraft) -> Result<client::Model> {
    validate(&draft)?;

    client::ActiveModel {
        name: Set(draft.name.trim().to_string()),
        email: Set(draft.email.trim().to_string()),
        phone: Set(draft.phone),
        address: Set(draft.address),
        tax_id: Set(draft.tax_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Replaces a client's contact fields.
///
/// # Errors
/// `NotFound` for an unknown id, validation errors as in create.
pub async fn update_client(
    db: &DatabaseConnection,
    client_id: i64,
    draft: ClientDraft,
) -> Result<client::Model> {
    validate(&draft)?;

    let mut model: client::ActiveModel = Client::find_by_id(client_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "client",
            key: client_id.to_string(),
        })?
        .into();

    model.name = Set(draft.name.trim().to_string());
    model.email = Set(draft.email.trim().to_string());
    model.phone = Set(draft.phone);
    model.address = Set(draft.address);
    model.tax_id = Set(draft.tax_id);

    model.update(db).await.map_err(Into::into)
}

/// Retrieves a client by id, `None` when absent.
pub async fn get_client(db: &DatabaseConnection, client_id: i64) -> Result<Option<client::Model>> {
    Client::find_by_id(client_id).one(db).await.map_err(Into::into)
}

/// Lists all clients ordered by name.
pub async fn list_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>> {
    Client::find()
        .order_by_asc(client::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}
