//! Client entity - Represents the businesses a quotation is addressed to.
//!
//! Clients are referenced by quotations but never owned by them; a client
//! with quotations on record cannot be deleted out from under them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Business or contact name
    pub name: String,
    /// Primary contact email
    pub email: String,
    /// Contact phone number, if provided
    pub phone: Option<String>,
    /// Postal address, if provided
    pub address: Option<String>,
    /// Fiscal identifier (e.g. RFC), if provided
    pub tax_id: Option<String>,
    /// When the client record was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Client and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One client receives many quotations
    #[sea_orm(has_many = "super::quotation::Entity")]
    Quotations,
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
