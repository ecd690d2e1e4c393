//! Product catalog business logic.
//!
//! Catalog entries are soft-deactivated, never hard-deleted, so existing
//! quotations keep resolving their product references. The catalog code is
//! unique; a duplicate surfaces as `Conflict` rather than a validation
//! error, since it is a race with other writers, not a malformed input.

use crate::{
    entities::{Product, ProductKind, product},
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};

/// Fields accepted when creating a catalog entry.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    /// Human-assigned catalog code, unique
    pub code: String,
    /// Display name
    pub name: String,
    /// Longer description
    pub description: Option<String>,
    /// Product or service
    pub kind: ProductKind,
    /// Price per unit
    pub unit_price: Decimal,
    /// Unit label; defaults to "pza"
    pub unit: Option<String>,
    /// Free-form category
    pub category: Option<String>,
    /// Reference to a product image
    pub image_url: Option<String>,
}

/// Optional field changes for an existing catalog entry. `None` leaves the
/// field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    /// New catalog code
    pub code: Option<String>,
    /// New display name
    pub name: Option<String>,
    /// New description
    pub description: Option<Option<String>>,
    /// New kind
    pub kind: Option<ProductKind>,
    /// New unit price
    pub unit_price: Option<Decimal>,
    /// New unit label
    pub unit: Option<String>,
    /// New category
    pub category: Option<Option<String>>,
    /// New image reference
    pub image_url: Option<Option<String>>,
    /// Reactivate or deactivate
    pub active: Option<bool>,
}

fn validate_price(unit_price: Decimal) -> Result<()> {
    if unit_price < Decimal::ZERO {
        return Err(Error::Validation {
            field: "unit_price",
            message: format!("unit price cannot be negative: {unit_price}"),
        });
    }
    Ok(())
}

/// Creates a new catalog entry.
///
/// # Errors
/// Validation errors for a blank code/name or negative price; `Conflict`
/// when the code is already taken.
pub async fn create_product(db: &DatabaseConnection, draft: ProductDraft) -> Result<product::Model> {
    if draft.code.trim().is_empty() {
        return Err(Error::Validation {
            field: "code",
            message: "product code cannot be empty".to_string(),
        });
    }
    if draft.name.trim().is_empty() {
        return Err(Error::Validation {
            field: "name",
            message: "product name cannot be empty".to_string(),
        });
    }
    validate_price(draft.unit_price)?;

    product::ActiveModel {
        code: Set(draft.code.trim().to_string()),
        name: Set(draft.name.trim().to_string()),
        description: Set(draft.description),
        kind: Set(draft.kind),
        unit_price: Set(draft.unit_price),
        unit: Set(draft.unit.unwrap_or_else(|| "pza".to_string())),
        category: Set(draft.category),
        image_url: Set(draft.image_url),
        active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| Error::on_unique_violation(e, "product code"))
}

/// Applies field changes to an existing catalog entry.
///
/// # Errors
/// `NotFound` for an unknown id, `Conflict` when a new code is already in
/// use by another product, validation errors for a negative price.
pub async fn update_product(
    db: &DatabaseConnection,
    product_id: i64,
    changes: ProductChanges,
) -> Result<product::Model> {
    if let Some(price) = changes.unit_price {
        validate_price(price)?;
    }

    let mut model: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "product",
            key: product_id.to_string(),
        })?
        .into();

    if let Some(code) = changes.code {
        model.code = Set(code.trim().to_string());
    }
    if let Some(name) = changes.name {
        model.name = Set(name.trim().to_string());
    }
    if let Some(description) = changes.description {
        model.description = Set(description);
    }
    if let Some(kind) = changes.kind {
        model.kind = Set(kind);
    }
    if let Some(unit_price) = changes.unit_price {
        model.unit_price = Set(unit_price);
    }
    if let Some(unit) = changes.unit {
        model.unit = Set(unit);
    }
    if let Some(category) = changes.category {
        model.category = Set(category);
    }
    if let Some(image_url) = changes.image_url {
        model.image_url = Set(image_url);
    }
    if let Some(active) = changes.active {
        model.active = Set(active);
    }

    model
        .update(db)
        .await
        .map_err(|e| Error::on_unique_violation(e, "product code"))
}

/// Soft-deactivates a catalog entry. Line items referencing it keep their
/// frozen concept, price and subtotal.
///
/// # Errors
/// Returns `NotFound` for an unknown id.
pub async fn deactivate_product(db: &DatabaseConnection, product_id: i64) -> Result<product::Model> {
    let mut model: product::ActiveModel = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "product",
            key: product_id.to_string(),
        })?
        .into();

    model.active = Set(false);
    model.update(db).await.map_err(Into::into)
}

/// Retrieves a catalog entry by id, active or not.
pub async fn get_product(db: &DatabaseConnection, product_id: i64) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id).one(db).await.map_err(Into::into)
}

/// Finds an active catalog entry by its code.
pub async fn find_product_by_code(
    db: &DatabaseConnection,
    code: &str,
) -> Result<Option<product::Model>> {
    Product::find()
        .filter(product::Column::Code.eq(code))
        .filter(product::Column::Active.eq(true))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists catalog entries ordered by name. Inactive entries are included
/// only on request.
pub async fn list_products(
    db: &DatabaseConnection,
    include_inactive: bool,
) -> Result<Vec<product::Model>> {
    let mut query = Product::find();
    if !include_inactive {
        query = query.filter(product::Column::Active.eq(true));
    }
    query
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Distinct categories in use by active catalog entries, sorted.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<String>> {
    Product::find()
        .select_only()
        .column(product::Column::Category)
        .filter(product::Column::Active.eq(true))
        .filter(product::Column::Category.is_not_null())
        .filter(product::Column::Category.ne(""))
        .distinct()
        .order_by_asc(product::Column::Category)
        .into_tuple::<String>()
        .all(db)
        .await
        .map_err(Into::into)
}
