//! Product entity - Catalog of products and services with fixed unit prices.
//!
//! Line items reference products weakly: deactivating (or even deleting) a
//! product must never change what an existing quotation said.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a catalog entry is a physical product or a service
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ProductKind {
    /// A physical good, priced per unit
    #[sea_orm(string_value = "product")]
    Product,
    /// A service, priced per engagement unit
    #[sea_orm(string_value = "service")]
    Service,
}

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-assigned catalog code, unique
    #[sea_orm(unique)]
    pub code: String,
    /// Display name
    pub name: String,
    /// Longer description, if provided
    pub description: Option<String>,
    /// Product or service
    pub kind: ProductKind,
    /// Price per unit
    pub unit_price: Decimal,
    /// Unit label (e.g. "pza", "hr")
    pub unit: String,
    /// Free-form category for grouping, if provided
    pub category: Option<String>,
    /// Reference to a product image, if provided
    pub image_url: Option<String>,
    /// Soft-delete flag - inactive products are hidden from the catalog
    /// but stay resolvable for historical line items
    pub active: bool,
    /// When the catalog entry was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One product is referenced by many line items
    #[sea_orm(has_many = "super::line_item::Entity")]
    LineItems,
}

impl Related<super::line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
