//! User entity - Staff accounts that create and manage quotations.
//!
//! A quotation stores its creator as a weak reference; users are only ever
//! deactivated, never removed, so historical quotations keep their author.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Access role of a staff account
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Role {
    /// Full administrative access, including user management
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Regular staff access
    #[sea_orm(string_value = "user")]
    User,
}

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across all accounts
    #[sea_orm(unique)]
    pub username: String,
    /// Salted password digest in `salt$sha256hex` form
    pub password_hash: String,
    /// Display name shown on quotations
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Access role
    pub role: Role,
    /// Whether the account can log in
    pub active: bool,
    /// When the account was created
    pub created_at: DateTimeUtc,
    /// Last successful authentication, if any
    pub last_login_at: Option<DateTimeUtc>,
}

/// Defines relationships between User and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One user creates many quotations
    #[sea_orm(has_many = "super::quotation::Entity")]
    Quotations,
}

impl Related<super::quotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Quotations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
