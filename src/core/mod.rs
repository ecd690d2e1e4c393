//! Core business logic - framework-agnostic quotation engine operations.
//! Pure helpers (numbering, totals, token minting) take their inputs
//! explicitly; everything touching storage takes the database handle as
//! its first argument.

/// Approval token minting and the one-shot decision state machine
pub mod approval;
/// Bounded, all-or-nothing attachment uploads
pub mod attachment;
/// Client ledger operations
pub mod client;
/// Document delivery and decision notification orchestration
pub mod delivery;
/// Quotation number generation
pub mod numbering;
/// Product and service catalog operations
pub mod product;
/// Quotation aggregate service - create, update, fetch, list
pub mod quotation;
/// Recipient address-list encoding
pub mod recipients;
/// Monetary totals computation
pub mod totals;
/// Staff account management and authentication
pub mod user;
