//! Quotation entity - The priced proposal document at the center of the system.
//!
//! A quotation owns its line items and attachments (cascade-deleted with it),
//! references its client and creator, and carries both the staff-controlled
//! workflow status and the token-driven approval state. The approval state is
//! a one-shot machine: pending until the token is redeemed, then terminal.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client-decision state of a quotation
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ApprovalState {
    /// Awaiting the client's decision
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Accepted by the client (terminal)
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Declined by the client (terminal)
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Quotation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quotations")]
pub struct Model {
    /// Unique identifier for the quotation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Human-readable document number, unique (e.g. `INT-20260806-0001`)
    #[sea_orm(unique)]
    pub number: String,
    /// The client this quotation is addressed to
    pub client_id: i64,
    /// When the quotation was created
    pub created_at: DateTimeUtc,
    /// Date the offer remains valid until, if stated
    pub valid_until: Option<Date>,
    /// Sum of line-item subtotals
    pub subtotal: Decimal,
    /// Tax amount derived from the subtotal
    pub tax: Decimal,
    /// Subtotal plus tax
    pub total: Decimal,
    /// Free-text notes shown on the document
    pub notes: Option<String>,
    /// Commercial terms and conditions
    pub terms: Option<String>,
    /// Staff-controlled workflow status (e.g. "pendiente", "enviada");
    /// independent of the approval state machine
    pub workflow_status: String,
    /// Single-use secret authorizing exactly one approval decision
    #[sea_orm(unique)]
    pub approval_token: String,
    /// Where the quotation stands in the approval state machine
    pub approval_state: ApprovalState,
    /// When the client decided, if they have
    pub decided_at: Option<DateTimeUtc>,
    /// Comments the client left with their decision
    pub client_comments: Option<String>,
    /// Weak reference to the staff account that created the quotation
    pub created_by: Option<i64>,
    /// Comma-delimited storage encoding of the recipient address set
    pub recipient_emails: Option<String>,
}

/// Defines relationships between Quotation and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each quotation is addressed to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id",
        on_delete = "Restrict"
    )]
    Client,
    /// Each quotation may record the staff account that created it
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    CreatedBy,
    /// One quotation owns many line items
    #[sea_orm(has_many = "super::line_item::Entity")]
    LineItems,
    /// One quotation owns many attachments
    #[sea_orm(has_many = "super::attachment::Entity")]
    Attachments,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreatedBy.def()
    }
}

impl Related<super::line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl Related<super::attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
