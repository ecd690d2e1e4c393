//! Delivery orchestration - rendering, per-recipient sending and decision
//! notification.
//!
//! The renderer and notifier are external collaborators: slow or failing
//! delivery must never roll back an already-committed quotation or
//! decision. Send failures are reported per recipient and logged, not
//! retried.

use crate::{
    core::{
        approval::{self, Decision, DecisionOutcome},
        quotation, recipients,
    },
    errors::{Error, Result},
    notify::Notifier,
    render::DocumentRenderer,
};
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

/// Result of one send attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientOutcome {
    /// The address the message was bound for
    pub recipient: String,
    /// Whether the notifier accepted the message
    pub delivered: bool,
}

/// Renders a quotation and sends it to each recipient.
///
/// Recipients are normalized (trimmed, deduplicated, order-preserving)
/// before sending. Each recipient succeeds or fails on its own; when at
/// least one send goes through, the targeted set is recorded on the
/// quotation. Rendering happens once, before any send.
///
/// # Errors
/// `Validation` when no recipients remain after normalization, `NotFound`
/// for an unknown quotation; a renderer failure propagates before anything
/// is sent.
pub async fn send_quotation(
    db: &DatabaseConnection,
    renderer: &dyn DocumentRenderer,
    notifier: &dyn Notifier,
    quotation_id: i64,
    recipient_list: &[String],
) -> Result<Vec<RecipientOutcome>> {
    let targets = recipients::normalize(recipient_list);
    if targets.is_empty() {
        return Err(Error::Validation {
            field: "recipients",
            message: "at least one recipient address is required".to_string(),
        });
    }

    let detail = quotation::get_quotation(db, quotation_id).await?;
    let document = renderer.render(&detail)?;

    let mut outcomes = Vec::with_capacity(targets.len());
    for recipient in &targets {
        match notifier
            .send_quotation(recipient, &detail, Some(&document))
            .await
        {
            Ok(()) => {
                info!(number = %detail.quotation.number, recipient, "quotation sent");
                outcomes.push(RecipientOutcome {
                    recipient: recipient.clone(),
                    delivered: true,
                });
            }
            Err(e) => {
                warn!(number = %detail.quotation.number, recipient, error = %e, "quotation send failed");
                outcomes.push(RecipientOutcome {
                    recipient: recipient.clone(),
                    delivered: false,
                });
            }
        }
    }

    if outcomes.iter().any(|o| o.delivered) {
        quotation::record_recipient_emails(db, quotation_id, &targets).await?;
    }

    Ok(outcomes)
}

/// Applies a token decision, then notifies the recorded recipients of the
/// result (falling back to the client's address when none were recorded).
///
/// Only the winning transition triggers notification; an `AlreadyDecided`
/// revisit stays silent. Notification failures are logged and swallowed -
/// the decision is already committed.
///
/// # Errors
/// Returns `NotFound` for an unknown token; storage failures propagate.
pub async fn decide_and_notify(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    token: &str,
    decision: Decision,
    comments: Option<String>,
) -> Result<DecisionOutcome> {
    let outcome = approval::decide(db, token, decision, comments).await?;

    if let DecisionOutcome::Decided(decided) = &outcome {
        let detail = quotation::get_quotation(db, decided.id).await?;
        let mut targets = recipients::parse(decided.recipient_emails.as_deref());
        if targets.is_empty() {
            targets.push(detail.client.email.clone());
        }

        for recipient in &targets {
            if let Err(e) = notifier
                .send_decision_notice(
                    recipient,
                    &detail,
                    decision,
                    decided.client_comments.as_deref(),
                )
                .await
            {
                warn!(number = %detail.quotation.number, recipient, error = %e, "decision notice failed");
            }
        }
    }

    Ok(outcome)
}
