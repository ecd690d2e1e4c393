//! Line item entity - One priced row within a quotation.
//!
//! Line items live and die with their quotation (cascade delete) and hold
//! only a weak reference to the catalog product they came from: the concept,
//! price and subtotal are frozen copies, so catalog changes never rewrite
//! history. Rows are immutable except as part of a full replace.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Line item database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "line_items")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The owning quotation
    pub quotation_id: i64,
    /// Weak reference to the catalog product, cleared if the product row
    /// is ever removed
    pub product_id: Option<i64>,
    /// Short label of what is being quoted
    pub concept: String,
    /// Longer description, if provided
    pub description: Option<String>,
    /// Number of units, at least 1
    pub quantity: i32,
    /// Price per unit at quotation time
    pub unit_price: Decimal,
    /// `quantity * unit_price`, stored for the document
    pub subtotal: Decimal,
}

/// Defines relationships between LineItem and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one quotation
    #[sea_orm(
        belongs_to = "super::quotation::Entity",
        from = "Column::QuotationId",
        to = "super::quotation::Column::Id",
        on_delete = "Cascade"
    )]
    Quotation,
    /// Each line item may reference one catalog product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_delete = "SetNull"
    )]
    Product,
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotation.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
