//! Quotation number generation.
//!
//! Numbers look like `INT-20260806-0001`: a fixed prefix, the current date
//! in the business timezone, and a four-digit sequence derived from the row
//! count at creation time. Uniqueness is ultimately enforced by the storage
//! layer's unique index on the number column, not by this arithmetic.

use crate::errors::{Error, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Resolves the calendar date in the business timezone.
///
/// The offset is a fixed number of hours from UTC so that numbering does not
/// depend on the server's locale or tz database.
///
/// # Errors
/// Returns a configuration error for offsets outside ±23 hours.
pub fn business_date(now: DateTime<Utc>, utc_offset_hours: i32) -> Result<NaiveDate> {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600).ok_or_else(|| Error::Config {
        message: format!("invalid business UTC offset: {utc_offset_hours}"),
    })?;
    Ok(now.with_timezone(&offset).date_naive())
}

/// Formats a quotation number from its parts.
#[must_use]
pub fn format_number(prefix: &str, date: NaiveDate, sequence: u64) -> String {
    format!("{prefix}-{}-{sequence:04}", date.format("%Y%m%d"))
}
