//! Attachment uploads - bounded in count and size, all-or-nothing on disk.
//!
//! Files are written under `<upload_dir>/quotation_<id>/` with a uniquified
//! name, then the rows are inserted in one transaction. On any failure every
//! file written during the attempt is removed; a rejected upload leaves zero
//! files and zero rows behind.

use crate::{
    config::settings::AttachmentConfig,
    entities::{Attachment, Quotation, attachment},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use std::path::{Path, PathBuf};

/// One file as received from the caller.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    /// Filename as uploaded
    pub original_name: String,
    /// MIME type reported by the uploader, if any
    pub mime_type: Option<String>,
    /// Raw file content
    pub content: Vec<u8>,
}

/// Keeps only characters safe for a filename on any filesystem.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('_').is_empty() {
        "archivo".to_string()
    } else {
        cleaned
    }
}

fn extension_allowed(name: &str, allowed: &[String]) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_lowercase();
            allowed.iter().any(|a| a == &ext)
        })
}

fn validate_uploads(config: &AttachmentConfig, uploads: &[AttachmentUpload]) -> Result<()> {
    if uploads.is_empty() {
        return Err(Error::Validation {
            field: "files",
            message: "no files received".to_string(),
        });
    }
    if uploads.len() > config.max_files {
        return Err(Error::Validation {
            field: "files",
            message: format!("at most {} files per quotation", config.max_files),
        });
    }

    let per_file_limit = config.max_file_mb * 1024 * 1024;
    let total_limit = config.max_total_mb * 1024 * 1024;
    let mut total_bytes: u64 = 0;

    for upload in uploads {
        if !extension_allowed(&upload.original_name, &config.allowed_extensions) {
            return Err(Error::Validation {
                field: "files",
                message: format!("file type not allowed: {}", upload.original_name),
            });
        }
        let size = upload.content.len() as u64;
        if size > per_file_limit {
            return Err(Error::Validation {
                field: "files",
                message: format!(
                    "{} exceeds the {} MiB per-file limit",
                    upload.original_name, config.max_file_mb
                ),
            });
        }
        total_bytes += size;
        if total_bytes > total_limit {
            return Err(Error::Validation {
                field: "files",
                message: format!("uploads exceed the {} MiB total limit", config.max_total_mb),
            });
        }
    }
    Ok(())
}

fn remove_saved(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "failed to clean up attachment file");
        }
    }
}

/// Stores a batch of attachments for a quotation.
///
/// Returns the number of attachments stored. Validation happens before any
/// file touches disk; a write or database failure removes everything the
/// attempt had written.
///
/// # Errors
/// `NotFound` for an unknown quotation; `Validation` when the batch breaks
/// the count, extension or size limits.
pub async fn add_attachments(
    db: &DatabaseConnection,
    config: &AttachmentConfig,
    quotation_id: i64,
    uploads: Vec<AttachmentUpload>,
) -> Result<usize> {
    Quotation::find_by_id(quotation_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "quotation",
            key: quotation_id.to_string(),
        })?;

    validate_uploads(config, &uploads)?;

    let dir = config.upload_dir.join(format!("quotation_{quotation_id}"));
    std::fs::create_dir_all(&dir)?;

    let mut saved: Vec<PathBuf> = Vec::new();
    let mut rows: Vec<attachment::ActiveModel> = Vec::new();
    let now = chrono::Utc::now();

    for upload in &uploads {
        let stored_name = format!(
            "{}_{}",
            uuid::Uuid::new_v4().simple(),
            sanitize_filename(&upload.original_name)
        );
        let path = dir.join(&stored_name);

        if let Err(e) = std::fs::write(&path, &upload.content) {
            remove_saved(&saved);
            return Err(e.into());
        }
        saved.push(path.clone());

        rows.push(attachment::ActiveModel {
            quotation_id: Set(quotation_id),
            original_name: Set(upload.original_name.clone()),
            stored_name: Set(stored_name),
            storage_path: Set(path.to_string_lossy().into_owned()),
            mime_type: Set(upload.mime_type.clone()),
            size_bytes: Set(upload.content.len() as i64),
            created_at: Set(now),
            ..Default::default()
        });
    }

    let stored = rows.len();
    if let Err(e) = insert_rows(db, rows).await {
        remove_saved(&saved);
        return Err(e);
    }

    Ok(stored)
}

async fn insert_rows(db: &DatabaseConnection, rows: Vec<attachment::ActiveModel>) -> Result<()> {
    let txn = db.begin().await?;
    for row in rows {
        row.insert(&txn).await?;
    }
    txn.commit().await?;
    Ok(())
}

/// Lists a quotation's attachments in upload order.
pub async fn list_attachments(
    db: &DatabaseConnection,
    quotation_id: i64,
) -> Result<Vec<attachment::Model>> {
    Attachment::find()
        .filter(attachment::Column::QuotationId.eq(quotation_id))
        .order_by_asc(attachment::Column::CreatedAt)
        .order_by_asc(attachment::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
