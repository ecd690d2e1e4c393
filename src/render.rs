//! Document rendering collaborator seam.
//!
//! Rendering a quotation into a printable file is an external concern; the
//! engine only needs a pure data-to-file function at the boundary. The
//! implementation (PDF layout, branding) lives outside this crate.

use crate::core::quotation::QuotationDetail;
use crate::errors::Result;
use std::path::PathBuf;

/// Renders a fully populated quotation into a file and returns its path.
///
/// Implementations must be pure with respect to the engine: no engine state
/// is read or written, and a rendering failure must never affect the stored
/// quotation.
pub trait DocumentRenderer: Send + Sync {
    /// Produces the printable document for `quotation`.
    fn render(&self, quotation: &QuotationDetail) -> Result<PathBuf>;
}
