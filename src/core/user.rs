//! Staff account management and authentication.
//!
//! Credentials are stored as `salt$sha256hex` over password+salt. Accounts
//! are deactivated, never deleted, so quotations keep their creator
//! reference. The deploy step seeds a default admin when the table has none.

use crate::{
    entities::{Role, User, user},
    errors::{Error, Result},
};
use rand::Rng;
use sea_orm::{QueryOrder, Set, prelude::*};
use sha2::{Digest, Sha256};

/// Fields accepted when creating a staff account.
#[derive(Debug, Clone)]
pub struct UserDraft {
    /// Login name, unique
    pub username: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Display name shown on quotations
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Access role
    pub role: Role,
}

/// Optional field changes for an existing account. `None` leaves the field
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    /// New display name
    pub full_name: Option<String>,
    /// New contact email
    pub email: Option<String>,
    /// New role
    pub role: Option<Role>,
    /// Activate or deactivate the account
    pub active: Option<bool>,
}

/// Hashes a password with a fresh random salt into `salt$sha256hex` form.
pub fn hash_password<R: Rng>(rng: &mut R, password: &str) -> String {
    let salt_bytes: [u8; 16] = rng.r#gen();
    let salt = hex::encode(salt_bytes);
    let digest = Sha256::digest(format!("{password}{salt}").as_bytes());
    format!("{salt}${}", hex::encode(digest))
}

/// Verifies a password against a stored `salt$sha256hex` credential.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once('$') else {
        return false;
    };
    let digest = Sha256::digest(format!("{password}{salt}").as_bytes());
    hex::encode(digest) == expected
}

/// Creates a staff account.
///
/// # Errors
/// Validation errors for blank username/password, `Conflict` when the
/// username is taken.
pub async fn create_user(db: &DatabaseConnection, draft: UserDraft) -> Result<user::Model> {
    if draft.username.trim().is_empty() {
        return Err(Error::Validation {
            field: "username",
            message: "username cannot be empty".to_string(),
        });
    }
    if draft.password.is_empty() {
        return Err(Error::Validation {
            field: "password",
            message: "password cannot be empty".to_string(),
        });
    }

    user::ActiveModel {
        username: Set(draft.username.trim().to_string()),
        password_hash: Set(hash_password(&mut rand::thread_rng(), &draft.password)),
        full_name: Set(draft.full_name.trim().to_string()),
        email: Set(draft.email.trim().to_string()),
        role: Set(draft.role),
        active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| Error::on_unique_violation(e, "username"))
}

/// Authenticates a staff account by username and password.
///
/// Returns `Ok(None)` for an unknown username, a deactivated account or a
/// wrong password - the three are indistinguishable to the caller. A
/// successful login stamps `last_login_at`.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Option<user::Model>> {
    let Some(found) = User::find()
        .filter(user::Column::Username.eq(username))
        .filter(user::Column::Active.eq(true))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    if !verify_password(password, &found.password_hash) {
        return Ok(None);
    }

    let mut model: user::ActiveModel = found.into();
    model.last_login_at = Set(Some(chrono::Utc::now()));
    Ok(Some(model.update(db).await?))
}

/// Retrieves an account by id.
pub async fn get_user(db: &DatabaseConnection, user_id: i64) -> Result<Option<user::Model>> {
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Lists all accounts ordered by display name.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::FullName)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Applies profile changes to an account.
///
/// # Errors
/// Returns `NotFound` for an unknown id.
pub async fn update_user(
    db: &DatabaseConnection,
    user_id: i64,
    changes: UserChanges,
) -> Result<user::Model> {
    let mut model: user::ActiveModel = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user",
            key: user_id.to_string(),
        })?
        .into();

    if let Some(full_name) = changes.full_name {
        model.full_name = Set(full_name);
    }
    if let Some(email) = changes.email {
        model.email = Set(email);
    }
    if let Some(role) = changes.role {
        model.role = Set(role);
    }
    if let Some(active) = changes.active {
        model.active = Set(active);
    }

    model.update(db).await.map_err(Into::into)
}

/// Replaces an account's password.
///
/// # Errors
/// `NotFound` for an unknown id, validation error for an empty password.
pub async fn change_password(
    db: &DatabaseConnection,
    user_id: i64,
    new_password: &str,
) -> Result<()> {
    if new_password.is_empty() {
        return Err(Error::Validation {
            field: "password",
            message: "password cannot be empty".to_string(),
        });
    }

    let mut model: user::ActiveModel = User::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "user",
            key: user_id.to_string(),
        })?
        .into();

    model.password_hash = Set(hash_password(&mut rand::thread_rng(), new_password));
    model.update(db).await?;
    Ok(())
}

/// Deactivates an account. Quotations created by it keep their reference.
///
/// # Errors
/// Returns `NotFound` for an unknown id.
pub async fn deactivate_user(db: &DatabaseConnection, user_id: i64) -> Result<user::Model> {
    update_user(
        db,
        user_id,
        UserChanges {
            active: Some(false),
            ..Default::default()
        },
    )
    .await
}

/// Inserts the default admin account when no admin exists yet. Returns
/// whether a seed happened. Run once at deployment.
pub async fn seed_default_admin(db: &DatabaseConnection) -> Result<bool> {
    let existing = User::find()
        .filter(user::Column::Username.eq("admin"))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(false);
    }

    create_user(
        db,
        UserDraft {
            username: "admin".to_string(),
            password: "admin123".to_string(),
            full_name: "Administrador".to_string(),
            email: "admin@example.com".to_string(),
            role: Role::Admin,
        },
    )
    .await?;
    Ok(true)
}
