//! Application settings loaded from config.toml
//!
//! Every section carries working defaults, so a missing or partial file
//! still yields a runnable configuration. Secrets (database URL, SMTP
//! credentials) are never read from the file; they come from the
//! environment at the point of use.

use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Quotation-number generation settings
    pub numbering: NumberingConfig,
    /// Tax computation settings
    pub tax: TaxConfig,
    /// Attachment upload limits and storage location
    pub attachments: AttachmentConfig,
    /// Outbound mail relay settings (credentials come from the environment)
    pub smtp: SmtpConfig,
}

/// Settings controlling the quotation number format
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NumberingConfig {
    /// Prefix of every quotation number
    pub prefix: String,
    /// UTC offset of the business timezone, in hours. Quotation dates are
    /// taken in this zone so numbers are stable across server locales.
    pub utc_offset_hours: i32,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            prefix: "INT".to_string(),
            utc_offset_hours: -6,
        }
    }
}

/// Settings controlling tax computation
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// Tax rate percentage applied when the caller does not supply one
    pub default_rate_percent: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            default_rate_percent: Decimal::from(16),
        }
    }
}

/// Limits and storage location for quotation attachments
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AttachmentConfig {
    /// Maximum number of files accepted per upload
    pub max_files: usize,
    /// Ceiling for a single file, in MiB
    pub max_file_mb: u64,
    /// Ceiling for one upload batch in total, in MiB
    pub max_total_mb: u64,
    /// Directory the files are stored under
    pub upload_dir: PathBuf,
    /// Lowercase file extensions accepted for upload
    pub allowed_extensions: Vec<String>,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            max_files: 5,
            max_file_mb: 15,
            max_total_mb: 20,
            upload_dir: PathBuf::from("uploads"),
            allowed_extensions: [
                "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "png", "jpg", "jpeg", "zip",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
        }
    }
}

/// Outbound mail relay settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// SMTP relay hostname
    pub host: String,
    /// SMTP relay port
    pub port: u16,
    /// Display name used in the From header
    pub from_name: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            from_name: "Cotizaciones".to_string(),
        }
    }
}

/// Loads application settings from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from the default location (./config.toml), falling back
/// to the built-in defaults when the file does not exist.
pub fn load_or_default() -> Result<AppConfig> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_config(path)
    } else {
        Ok(AppConfig::default())
    }
}
