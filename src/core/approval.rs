//! Approval token minting and the one-shot decision state machine.
//!
//! Every quotation is born pending with a single-use, URL-safe random token.
//! Redeeming the token moves the quotation to approved or rejected exactly
//! once; later redemptions - any decision value, any number of times - see
//! `AlreadyDecided` and leave the recorded decision and comments untouched.
//! The token authorizes that one transition plus read-only retrieval of the
//! quotation; it is not tied to any user account.

use crate::{
    entities::{ApprovalState, Quotation, quotation},
    errors::{Error, Result},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use sea_orm::{Set, TransactionTrait, prelude::*};

/// Bytes of entropy in an approval token (256 bits).
pub const TOKEN_BYTES: usize = 32;

/// The decision a token holder can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Accept the quotation
    Approved,
    /// Decline the quotation
    Rejected,
}

impl Decision {
    /// The terminal approval state this decision lands in.
    #[must_use]
    pub const fn state(self) -> ApprovalState {
        match self {
            Self::Approved => ApprovalState::Approved,
            Self::Rejected => ApprovalState::Rejected,
        }
    }
}

/// Result of a decision attempt on a live token.
#[derive(Debug, Clone)]
pub enum DecisionOutcome {
    /// This call won the transition; the quotation is now terminal.
    Decided(quotation::Model),
    /// The quotation had already been decided. Idempotent success: nothing
    /// was changed and no notifications should fire.
    AlreadyDecided {
        /// The decision that was recorded first
        state: ApprovalState,
        /// When it was recorded
        decided_at: Option<DateTimeUtc>,
        /// The comments recorded with it
        comments: Option<String>,
    },
}

/// Mints a fresh URL-safe approval token.
///
/// The RNG is a parameter so tests can seed it; production callers pass
/// `rand::thread_rng()`. Uniqueness across quotations is enforced by the
/// unique index on the token column.
pub fn mint_token<R: Rng>(rng: &mut R) -> String {
    let bytes: [u8; TOKEN_BYTES] = rng.r#gen();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Fetches the quotation a token refers to, for display on the public
/// decision page.
///
/// # Errors
/// Returns `NotFound` for an unknown token.
pub async fn find_by_token(db: &DatabaseConnection, token: &str) -> Result<quotation::Model> {
    Quotation::find()
        .filter(quotation::Column::ApprovalToken.eq(token))
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "quotation",
            key: token.to_string(),
        })
}

/// Applies a decision to the quotation holding `token`.
///
/// The lookup and the guarded update run in one transaction; the update only
/// matches while the state is still pending, so concurrent attempts on the
/// same token produce exactly one `Decided` winner and `AlreadyDecided` for
/// everyone else.
///
/// # Errors
/// Returns `NotFound` for an unknown token; storage failures propagate.
pub async fn decide(
    db: &DatabaseConnection,
    token: &str,
    decision: Decision,
    comments: Option<String>,
) -> Result<DecisionOutcome> {
    let txn = db.begin().await?;

    let existing = Quotation::find()
        .filter(quotation::Column::ApprovalToken.eq(token))
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "quotation",
            key: token.to_string(),
        })?;

    let update = quotation::ActiveModel {
        approval_state: Set(decision.state()),
        decided_at: Set(Some(chrono::Utc::now())),
        client_comments: Set(comments),
        ..Default::default()
    };

    let result = Quotation::update_many()
        .set(update)
        .filter(quotation::Column::ApprovalToken.eq(token))
        .filter(quotation::Column::ApprovalState.eq(ApprovalState::Pending))
        .exec(&txn)
        .await?;

    if result.rows_affected == 0 {
        // Lost the race or the link was revisited: report what stands.
        txn.commit().await?;
        return Ok(DecisionOutcome::AlreadyDecided {
            state: existing.approval_state,
            decided_at: existing.decided_at,
            comments: existing.client_comments,
        });
    }

    let updated = Quotation::find_by_id(existing.id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "quotation",
            key: existing.id.to_string(),
        })?;

    txn.commit().await?;
    Ok(DecisionOutcome::Decided(updated))
}
