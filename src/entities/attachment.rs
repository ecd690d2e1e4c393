//! Attachment entity - A file stored alongside a quotation.
//!
//! Attachments are owned by their quotation and cascade-deleted with it.
//! The row records both the name the uploader used and the uniquified name
//! the file was stored under.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Attachment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    /// Unique identifier for the attachment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// The owning quotation
    pub quotation_id: i64,
    /// Filename as uploaded
    pub original_name: String,
    /// Uniquified filename on disk
    pub stored_name: String,
    /// Full path of the stored file
    pub storage_path: String,
    /// MIME type reported at upload, if any
    pub mime_type: Option<String>,
    /// File size in bytes
    pub size_bytes: i64,
    /// When the attachment was stored
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Attachment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each attachment belongs to one quotation
    #[sea_orm(
        belongs_to = "super::quotation::Entity",
        from = "Column::QuotationId",
        to = "super::quotation::Column::Id",
        on_delete = "Cascade"
    )]
    Quotation,
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
