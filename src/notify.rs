//! Outbound notification collaborator.
//!
//! The engine records which recipients were targeted but never retries a
//! failed send; retry policy belongs to the implementation behind this
//! trait. The SMTP implementation relays through a STARTTLS host with
//! credentials taken from the environment at construction time.

use crate::config::settings::SmtpConfig;
use crate::core::approval::Decision;
use crate::core::quotation::QuotationDetail;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::path::Path;

/// Sends quotation-related mail to a single recipient per call.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends the quotation to `recipient`, attaching the rendered document
    /// when one is provided.
    async fn send_quotation(
        &self,
        recipient: &str,
        quotation: &QuotationDetail,
        document: Option<&Path>,
    ) -> Result<()>;

    /// Sends the decision confirmation to `recipient`.
    async fn send_decision_notice(
        &self,
        recipient: &str,
        quotation: &QuotationDetail,
        decision: Decision,
        comments: Option<&str>,
    ) -> Result<()>;
}

/// SMTP-backed [`Notifier`] using an async STARTTLS relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    /// Builds a notifier for the given relay and sender credentials.
    ///
    /// # Errors
    /// Returns a configuration error when the relay or sender address is
    /// invalid.
    pub fn new(config: &SmtpConfig, email: &str, password: &str) -> Result<Self> {
        let credentials = Credentials::new(email.to_string(), password.to_string());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| Error::Config {
                message: format!("failed to create SMTP relay: {e}"),
            })?
            .port(config.port)
            .credentials(credentials)
            .build();

        let from: Mailbox =
            format!("{} <{email}>", config.from_name)
                .parse()
                .map_err(|e| Error::Config {
                    message: format!("invalid sender address: {e}"),
                })?;

        Ok(Self { transport, from })
    }

    /// Builds a notifier with credentials from `SMTP_EMAIL` and
    /// `SMTP_PASSWORD`. Loaded at the point of use, never stored in the
    /// application configuration.
    ///
    /// # Errors
    /// Returns a configuration error when either variable is missing.
    pub fn from_env(config: &SmtpConfig) -> Result<Self> {
        let email = std::env::var("SMTP_EMAIL").map_err(|_| Error::Config {
            message: "SMTP_EMAIL not set".to_string(),
        })?;
        let password = std::env::var("SMTP_PASSWORD").map_err(|_| Error::Config {
            message: "SMTP_PASSWORD not set".to_string(),
        })?;
        Self::new(config, &email, &password)
    }

    fn notify_error(recipient: &str, error: impl std::fmt::Display) -> Error {
        Error::Notify {
            recipient: recipient.to_string(),
            message: error.to_string(),
        }
    }

    fn parse_recipient(recipient: &str) -> Result<Mailbox> {
        recipient
            .parse()
            .map_err(|e| Self::notify_error(recipient, format!("invalid address: {e}")))
    }

    async fn deliver(&self, recipient: &str, message: Message) -> Result<()> {
        self.transport
            .send(message)
            .await
            .map_err(|e| Self::notify_error(recipient, e))?;
        Ok(())
    }
}

fn quotation_body(detail: &QuotationDetail) -> String {
    let q = &detail.quotation;
    let mut body = format!(
        "Estimado(a) {},\n\nLe compartimos la cotización {} por un total de {}.\n",
        detail.client.name, q.number, q.total
    );
    if let Some(valid_until) = q.valid_until {
        body.push_str(&format!("Vigencia: {valid_until}.\n"));
    }
    if let Some(notes) = &q.notes {
        body.push_str(&format!("\nNotas: {notes}\n"));
    }
    body
}

fn decision_body(detail: &QuotationDetail, decision: Decision, comments: Option<&str>) -> String {
    let verdict = match decision {
        Decision::Approved => "APROBADA",
        Decision::Rejected => "RECHAZADA",
    };
    let mut body = format!(
        "La cotización {} ha sido {verdict} por el cliente {}.\n",
        detail.quotation.number, detail.client.name
    );
    if let Some(comments) = comments {
        body.push_str(&format!("\nComentarios del cliente: {comments}\n"));
    }
    body
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_quotation(
        &self,
        recipient: &str,
        quotation: &QuotationDetail,
        document: Option<&Path>,
    ) -> Result<()> {
        let to = Self::parse_recipient(recipient)?;
        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(format!("Cotización {}", quotation.quotation.number));
        let body = quotation_body(quotation);

        let message = match document {
            Some(path) => {
                let content = std::fs::read(path)?;
                let filename = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("cotizacion.pdf")
                    .to_string();
                let content_type = ContentType::parse("application/pdf")
                    .map_err(|e| Self::notify_error(recipient, e))?;
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(body))
                        .singlepart(Attachment::new(filename).body(content, content_type)),
                )
            }
            None => builder.singlepart(SinglePart::plain(body)),
        }
        .map_err(|e| Self::notify_error(recipient, e))?;

        self.deliver(recipient, message).await
    }

    async fn send_decision_notice(
        &self,
        recipient: &str,
        quotation: &QuotationDetail,
        decision: Decision,
        comments: Option<&str>,
    ) -> Result<()> {
        let verdict = match decision {
            Decision::Approved => "Aprobada",
            Decision::Rejected => "Rechazada",
        };
        let to = Self::parse_recipient(recipient)?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(format!(
                "Confirmación: Cotización {} {verdict}",
                quotation.quotation.number
            ))
            .singlepart(SinglePart::plain(decision_body(quotation, decision, comments)))
            .map_err(|e| Self::notify_error(recipient, e))?;

        self.deliver(recipient, message).await
    }
}
