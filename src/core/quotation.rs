//! Quotation aggregate service - creation, update, retrieval and listing.
//!
//! A quotation and its line items form one unit: they are written in one
//! transaction on create, replaced wholesale in one transaction on update,
//! and partial writes are never observable. Totals always come from the
//! shared calculator, the number from the count-plus-one sequence with the
//! unique index as the race-breaker, and the approval token is minted once
//! here and never regenerated.

use crate::{
    config::settings::AppConfig,
    core::{approval, numbering, recipients, totals},
    entities::{
        ApprovalState, Attachment, Client, LineItem, Product, Quotation, attachment, client,
        line_item, quotation, user,
    },
    errors::{Error, Result},
};
use rust_decimal::Decimal;
use sea_orm::{
    ConnectionTrait, FromQueryResult, JoinType, PaginatorTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait, prelude::*,
};

/// One line of a quotation as submitted by the caller.
#[derive(Debug, Clone)]
pub struct LineItemInput {
    /// Catalog product this line came from, if any
    pub product_id: Option<i64>,
    /// Short label of what is being quoted
    pub concept: String,
    /// Longer description, if any
    pub description: Option<String>,
    /// Number of units, at least 1
    pub quantity: i32,
    /// Price per unit
    pub unit_price: Decimal,
}

/// Everything needed to create or replace a quotation.
#[derive(Debug, Clone, Default)]
pub struct QuotationDraft {
    /// The client the quotation is addressed to
    pub client_id: i64,
    /// The line items, in document order
    pub items: Vec<LineItemInput>,
    /// Date the offer remains valid until
    pub valid_until: Option<Date>,
    /// Free-text notes
    pub notes: Option<String>,
    /// Commercial terms
    pub terms: Option<String>,
    /// Tax rate percentage; the configured default applies when `None`
    pub tax_rate_percent: Option<Decimal>,
    /// Staff account creating the quotation, when known
    pub created_by: Option<i64>,
}

/// A quotation row denormalized for the overview list.
#[derive(Debug, Clone, FromQueryResult)]
pub struct QuotationSummary {
    /// Quotation id
    pub id: i64,
    /// Document number
    pub number: String,
    /// When it was created
    pub created_at: DateTimeUtc,
    /// Monetary total
    pub total: Decimal,
    /// Staff workflow status
    pub workflow_status: String,
    /// Approval state
    pub approval_state: ApprovalState,
    /// When the client decided, if they have
    pub decided_at: Option<DateTimeUtc>,
    /// Name of the client
    pub client_name: String,
    /// Email of the client
    pub client_email: String,
    /// Display name of the creator; `None` for legacy or unassigned rows
    pub created_by_name: Option<String>,
}

/// One line item joined with the catalog data the document displays.
#[derive(Debug, Clone)]
pub struct ItemDetail {
    /// The stored line item
    pub item: line_item::Model,
    /// Catalog code of the referenced product, if the reference survives
    pub product_code: Option<String>,
    /// Catalog image of the referenced product, if any
    pub product_image_url: Option<String>,
}

/// A fully populated quotation, ready for rendering or display.
#[derive(Debug, Clone)]
pub struct QuotationDetail {
    /// The quotation row
    pub quotation: quotation::Model,
    /// The client it is addressed to
    pub client: client::Model,
    /// Display name of the creator, when known
    pub created_by_name: Option<String>,
    /// Line items in document order
    pub items: Vec<ItemDetail>,
    /// Attachments in upload order
    pub attachments: Vec<attachment::Model>,
}

fn validate_items(items: &[LineItemInput]) -> Result<()> {
    for item in items {
        if item.concept.trim().is_empty() {
            return Err(Error::Validation {
                field: "concept",
                message: "line item concept cannot be empty".to_string(),
            });
        }
    }
    Ok(())
}

fn pairs(items: &[LineItemInput]) -> Vec<(i32, Decimal)> {
    items.iter().map(|i| (i.quantity, i.unit_price)).collect()
}

async fn insert_items<C: ConnectionTrait>(
    txn: &C,
    quotation_id: i64,
    items: &[LineItemInput],
) -> Result<()> {
    for item in items {
        line_item::ActiveModel {
            quotation_id: Set(quotation_id),
            product_id: Set(item.product_id),
            concept: Set(item.concept.trim().to_string()),
            description: Set(item.description.clone()),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            subtotal: Set(totals::line_subtotal(item.quantity, item.unit_price)),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

/// Creates a quotation with its line items as one atomic unit.
///
/// Returns the new id and document number. A numbering race surfaces as
/// `Conflict`; the caller decides whether to retry.
///
/// # Errors
/// `NotFound` for an unknown client, `Validation` for an empty or malformed
/// item set, `Conflict` when the generated number or token collides.
pub async fn create_quotation(
    db: &DatabaseConnection,
    config: &AppConfig,
    draft: QuotationDraft,
) -> Result<(i64, String)> {
    validate_items(&draft.items)?;
    let rate = draft
        .tax_rate_percent
        .unwrap_or(config.tax.default_rate_percent);
    let computed = totals::compute(&pairs(&draft.items), rate)?;

    let now = chrono::Utc::now();
    let date = numbering::business_date(now, config.numbering.utc_offset_hours)?;
    let token = approval::mint_token(&mut rand::thread_rng());

    let txn = db.begin().await?;

    Client::find_by_id(draft.client_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "client",
            key: draft.client_id.to_string(),
        })?;

    // Sequence = current row count + 1; the unique index on `number` is the
    // backstop when two creations race on the same count.
    let count = Quotation::find().count(&txn).await?;
    let number = numbering::format_number(&config.numbering.prefix, date, count + 1);

    let inserted = quotation::ActiveModel {
        number: Set(number.clone()),
        client_id: Set(draft.client_id),
        created_at: Set(now),
        valid_until: Set(draft.valid_until),
        subtotal: Set(computed.subtotal),
        tax: Set(computed.tax),
        total: Set(computed.total),
        notes: Set(draft.notes),
        terms: Set(draft.terms),
        workflow_status: Set("pendiente".to_string()),
        approval_token: Set(token),
        approval_state: Set(ApprovalState::Pending),
        created_by: Set(draft.created_by),
        ..Default::default()
    }
    .insert(&txn)
    .await
    .map_err(|e| Error::on_unique_violation(e, "quotation number"))?;

    insert_items(&txn, inserted.id, &draft.items).await?;

    txn.commit().await?;
    Ok((inserted.id, number))
}

/// Replaces a quotation's content: client, dates, text fields and the whole
/// item set, with totals recomputed from scratch. Number, token, approval
/// state and workflow status are left untouched. Atomic.
///
/// # Errors
/// `NotFound` for an unknown quotation or client, `Validation` for a
/// malformed item set.
pub async fn update_quotation(
    db: &DatabaseConnection,
    config: &AppConfig,
    id: i64,
    draft: QuotationDraft,
) -> Result<()> {
    validate_items(&draft.items)?;
    let rate = draft
        .tax_rate_percent
        .unwrap_or(config.tax.default_rate_percent);
    let computed = totals::compute(&pairs(&draft.items), rate)?;

    let txn = db.begin().await?;

    let existing = Quotation::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "quotation",
            key: id.to_string(),
        })?;

    Client::find_by_id(draft.client_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "client",
            key: draft.client_id.to_string(),
        })?;

    let mut model: quotation::ActiveModel = existing.into();
    model.client_id = Set(draft.client_id);
    model.valid_until = Set(draft.valid_until);
    model.subtotal = Set(computed.subtotal);
    model.tax = Set(computed.tax);
    model.total = Set(computed.total);
    model.notes = Set(draft.notes);
    model.terms = Set(draft.terms);
    model.update(&txn).await?;

    LineItem::delete_many()
        .filter(line_item::Column::QuotationId.eq(id))
        .exec(&txn)
        .await?;
    insert_items(&txn, id, &draft.items).await?;

    txn.commit().await?;
    Ok(())
}

/// Fetches a quotation with its client, creator name, items and attachments.
///
/// # Errors
/// Returns `NotFound` for an unknown id.
pub async fn get_quotation(db: &DatabaseConnection, id: i64) -> Result<QuotationDetail> {
    let quotation = Quotation::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "quotation",
            key: id.to_string(),
        })?;

    let client = Client::find_by_id(quotation.client_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "client",
            key: quotation.client_id.to_string(),
        })?;

    let created_by_name = match quotation.created_by {
        Some(user_id) => crate::entities::User::find_by_id(user_id)
            .one(db)
            .await?
            .map(|u| u.full_name),
        None => None,
    };

    let items = LineItem::find()
        .filter(line_item::Column::QuotationId.eq(id))
        .order_by_asc(line_item::Column::Id)
        .find_also_related(Product)
        .all(db)
        .await?
        .into_iter()
        .map(|(item, product)| ItemDetail {
            item,
            product_code: product.as_ref().map(|p| p.code.clone()),
            product_image_url: product.and_then(|p| p.image_url),
        })
        .collect();

    let attachments = Attachment::find()
        .filter(attachment::Column::QuotationId.eq(id))
        .order_by_asc(attachment::Column::CreatedAt)
        .order_by_asc(attachment::Column::Id)
        .all(db)
        .await?;

    Ok(QuotationDetail {
        quotation,
        client,
        created_by_name,
        items,
        attachments,
    })
}

/// Lists all quotations, newest first, with client name/email and creator
/// display name denormalized. Rows without a creator are kept (left join).
pub async fn list_quotations(db: &DatabaseConnection) -> Result<Vec<QuotationSummary>> {
    Quotation::find()
        .select_only()
        .columns([
            quotation::Column::Id,
            quotation::Column::Number,
            quotation::Column::CreatedAt,
            quotation::Column::Total,
            quotation::Column::WorkflowStatus,
            quotation::Column::ApprovalState,
            quotation::Column::DecidedAt,
        ])
        .column_as(client::Column::Name, "client_name")
        .column_as(client::Column::Email, "client_email")
        .column_as(user::Column::FullName, "created_by_name")
        .join(JoinType::InnerJoin, quotation::Relation::Client.def())
        .join(JoinType::LeftJoin, quotation::Relation::CreatedBy.def())
        .order_by_desc(quotation::Column::CreatedAt)
        .order_by_desc(quotation::Column::Id)
        .into_model::<QuotationSummary>()
        .all(db)
        .await
        .map_err(Into::into)
}

/// Sets the staff-controlled workflow status. No effect on the approval
/// state machine.
///
/// # Errors
/// `NotFound` for an unknown quotation, `Validation` for a blank status.
pub async fn set_workflow_status(db: &DatabaseConnection, id: i64, status: &str) -> Result<()> {
    if status.trim().is_empty() {
        return Err(Error::Validation {
            field: "status",
            message: "workflow status cannot be empty".to_string(),
        });
    }

    let quotation = Quotation::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "quotation",
            key: id.to_string(),
        })?;

    let mut model: quotation::ActiveModel = quotation.into();
    model.workflow_status = Set(status.trim().to_string());
    model.update(db).await?;
    Ok(())
}

/// Records the set of addresses a quotation was sent to. Pure field
/// mutation; the delimited string is only the storage encoding.
///
/// # Errors
/// Returns `NotFound` for an unknown quotation.
pub async fn record_recipient_emails(
    db: &DatabaseConnection,
    id: i64,
    emails: &[String],
) -> Result<()> {
    let quotation = Quotation::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| Error::NotFound {
            entity: "quotation",
            key: id.to_string(),
        })?;

    let mut model: quotation::ActiveModel = quotation.into();
    model.recipient_emails = Set(recipients::serialize(emails));
    model.update(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{
        create_test_client, create_test_product, create_test_quotation, create_test_user,
        test_config, test_items, setup_test_db,
    };

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn test_create_quotation_reference_scenario() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme").await?;

        let (id, number) = create_quotation(
            &db,
            &test_config(),
            QuotationDraft {
                client_id: client.id,
                items: test_items(),
                ..Default::default()
            },
        )
        .await?;

        let detail = get_quotation(&db, id).await?;
        assert_eq!(detail.quotation.subtotal, d("250.00"));
        assert_eq!(detail.quotation.tax, d("40.00"));
        assert_eq!(detail.quotation.total, d("290.00"));
        assert_eq!(detail.quotation.approval_state, ApprovalState::Pending);
        assert_eq!(detail.quotation.workflow_status, "pendiente");
        assert_eq!(detail.quotation.approval_token.len(), 43);
        assert_eq!(detail.items.len(), 2);
        assert_eq!(detail.items[0].item.subtotal, d("200.00"));
        assert_eq!(detail.items[1].item.subtotal, d("50.00"));

        // INT-YYYYMMDD-0001 shape
        assert!(number.starts_with("INT-"));
        assert!(number.ends_with("-0001"));
        assert_eq!(number.len(), "INT-20260806-0001".len());
        assert_eq!(detail.quotation.number, number);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_quotation_sequences_and_unique_tokens() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme").await?;
        let config = test_config();

        let (first, n1) = create_quotation(
            &db,
            &config,
            QuotationDraft {
                client_id: client.id,
                items: test_items(),
                ..Default::default()
            },
        )
        .await?;
        let (second, n2) = create_quotation(
            &db,
            &config,
            QuotationDraft {
                client_id: client.id,
                items: test_items(),
                ..Default::default()
            },
        )
        .await?;

        assert_ne!(n1, n2);
        assert!(n1.ends_with("-0001"));
        assert!(n2.ends_with("-0002"));

        let t1 = Quotation::find_by_id(first).one(&db).await?.unwrap().approval_token;
        let t2 = Quotation::find_by_id(second).one(&db).await?.unwrap().approval_token;
        assert_ne!(t1, t2);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_quotation_unknown_client() -> Result<()> {
        let db = setup_test_db().await?;
        let result = create_quotation(
            &db,
            &test_config(),
            QuotationDraft {
                client_id: 999,
                items: test_items(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "client", .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_quotation_rejects_bad_items() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme").await?;
        let config = test_config();

        let empty = create_quotation(
            &db,
            &config,
            QuotationDraft {
                client_id: client.id,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            empty.unwrap_err(),
            Error::Validation { field: "items", .. }
        ));

        let mut items = test_items();
        items[0].quantity = 0;
        let bad_quantity = create_quotation(
            &db,
            &config,
            QuotationDraft {
                client_id: client.id,
                items,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            bad_quantity.unwrap_err(),
            Error::Validation { field: "quantity", .. }
        ));

        let mut items = test_items();
        items[1].unit_price = d("-1.00");
        let bad_price = create_quotation(
            &db,
            &config,
            QuotationDraft {
                client_id: client.id,
                items,
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            bad_price.unwrap_err(),
            Error::Validation { field: "unit_price", .. }
        ));

        // Nothing was committed by the failed attempts
        assert_eq!(Quotation::find().count(&db).await?, 0);
        assert_eq!(LineItem::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_numbering_race_surfaces_conflict() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme").await?;
        let (id, number) = create_test_quotation(&db, client.id).await?;

        // Simulate a lost creation race: the row count says the next
        // sequence is 0002, but that number is already taken.
        let taken = number.replace("-0001", "-0002");
        let mut model: quotation::ActiveModel =
            Quotation::find_by_id(id).one(&db).await?.unwrap().into();
        model.number = Set(taken);
        model.update(&db).await?;

        let result = create_quotation(
            &db,
            &test_config(),
            QuotationDraft {
                client_id: client.id,
                items: test_items(),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Conflict { resource: "quotation number" }
        ));

        // The losing attempt committed nothing
        assert_eq!(Quotation::find().count(&db).await?, 1);
        assert_eq!(LineItem::find().count(&db).await?, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_replaces_items_and_preserves_identity() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme").await?;
        let config = test_config();
        let (id, number) = create_test_quotation(&db, client.id).await?;
        let before = Quotation::find_by_id(id).one(&db).await?.unwrap();

        update_quotation(
            &db,
            &config,
            id,
            QuotationDraft {
                client_id: client.id,
                items: vec![LineItemInput {
                    product_id: None,
                    concept: "Soporte anual".to_string(),
                    description: None,
                    quantity: 1,
                    unit_price: d("1000.00"),
                }],
                notes: Some("updated".to_string()),
                ..Default::default()
            },
        )
        .await?;

        let detail = get_quotation(&db, id).await?;
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.quotation.subtotal, d("1000.00"));
        assert_eq!(detail.quotation.tax, d("160.00"));
        assert_eq!(detail.quotation.total, d("1160.00"));
        assert_eq!(detail.quotation.notes.as_deref(), Some("updated"));

        // Identity and approval fields survive the replace
        assert_eq!(detail.quotation.number, number);
        assert_eq!(detail.quotation.approval_token, before.approval_token);
        assert_eq!(detail.quotation.approval_state, ApprovalState::Pending);

        // The old items are really gone, not orphaned
        assert_eq!(LineItem::find().count(&db).await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_and_keeps_creatorless_rows() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme").await?;
        let creator = create_test_user(&db, "vendedor").await?;
        let config = test_config();

        let (first, _) = create_quotation(
            &db,
            &config,
            QuotationDraft {
                client_id: client.id,
                items: test_items(),
                created_by: Some(creator.id),
                ..Default::default()
            },
        )
        .await?;
        let (second, _) = create_quotation(
            &db,
            &config,
            QuotationDraft {
                client_id: client.id,
                items: test_items(),
                ..Default::default()
            },
        )
        .await?;

        let list = list_quotations(&db).await?;
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, second);
        assert_eq!(list[1].id, first);
        assert_eq!(list[0].client_name, "Acme");
        assert_eq!(list[0].created_by_name, None);
        assert_eq!(list[1].created_by_name.as_deref(), Some("vendedor"));
        Ok(())
    }

    #[tokio::test]
    async fn test_product_deactivation_leaves_line_items_intact() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme").await?;
        let product = create_test_product(&db, "SRV-001").await?;

        let (id, _) = create_quotation(
            &db,
            &test_config(),
            QuotationDraft {
                client_id: client.id,
                items: vec![LineItemInput {
                    product_id: Some(product.id),
                    concept: product.name.clone(),
                    description: None,
                    quantity: 2,
                    unit_price: product.unit_price,
                }],
                ..Default::default()
            },
        )
        .await?;

        crate::core::product::deactivate_product(&db, product.id).await?;

        let detail = get_quotation(&db, id).await?;
        let line = &detail.items[0];
        assert_eq!(line.item.concept, product.name);
        assert_eq!(line.item.unit_price, product.unit_price);
        assert_eq!(
            line.item.subtotal,
            totals::line_subtotal(2, product.unit_price)
        );
        // Weak reference still resolves; the product is only hidden
        assert_eq!(line.item.product_id, Some(product.id));
        assert_eq!(line.product_code.as_deref(), Some("SRV-001"));
        Ok(())
    }

    #[tokio::test]
    async fn test_workflow_status_and_recipients_mutators() -> Result<()> {
        let db = setup_test_db().await?;
        let client = create_test_client(&db, "Acme").await?;
        let (id, _) = create_test_quotation(&db, client.id).await?;

        set_workflow_status(&db, id, "enviada").await?;
        record_recipient_emails(
            &db,
            id,
            &["a@x.mx".to_string(), " a@x.mx ".to_string(), "b@x.mx".to_string()],
        )
        .await?;

        let stored = Quotation::find_by_id(id).one(&db).await?.unwrap();
        assert_eq!(stored.workflow_status, "enviada");
        assert_eq!(stored.recipient_emails.as_deref(), Some("a@x.mx,b@x.mx"));
        // Neither mutator touches the state machine
        assert_eq!(stored.approval_state, ApprovalState::Pending);

        let blank = set_workflow_status(&db, id, "  ").await;
        assert!(matches!(
            blank.unwrap_err(),
            Error::Validation { field: "status", .. }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_quotation_not_found() -> Result<()> {
        let db = setup_test_db().await?;
        let result = get_quotation(&db, 41).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound { entity: "quotation", .. }
        ));
        Ok(())
    }
}
