//! Mail relay: hands a validated contact submission to the operator's
//! mailbox.
//!
//! `AppState` carries an `Arc<dyn MailRelay>`: `SmtpRelay` when SMTP is
//! configured, `UnconfiguredRelay` otherwise.

use async_trait::async_trait;
use chrono::Utc;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::SmtpConfig;
use crate::contact::form::ContactFormValues;
use crate::render::escape_html;

/// Port on which the relay expects TLS from the first byte rather than STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("mail delivery is not configured")]
    NotConfigured,

    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("could not build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// What the relay reported on acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryReceipt {
    pub code: String,
    pub message: Vec<String>,
}

#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn deliver(&self, values: &ContactFormValues) -> Result<DeliveryReceipt, RelayError>;
}

pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    receiver: Mailbox,
}

impl SmtpRelay {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, RelayError> {
        let receiver = parse_mailbox(&config.receiver)?;

        let builder = if config.port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
        };

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            receiver,
        })
    }
}

#[async_trait]
impl MailRelay for SmtpRelay {
    async fn deliver(&self, values: &ContactFormValues) -> Result<DeliveryReceipt, RelayError> {
        let message = build_message(values, &self.receiver)?;
        let response = self.transport.send(message).await?;

        let receipt = DeliveryReceipt {
            code: response.code().to_string(),
            message: response.message().map(|line| line.to_string()).collect(),
        };
        info!("Contact message relayed (code {})", receipt.code);
        Ok(receipt)
    }
}

/// Stand-in used when SMTP settings are incomplete.
pub struct UnconfiguredRelay;

#[async_trait]
impl MailRelay for UnconfiguredRelay {
    async fn deliver(&self, _values: &ContactFormValues) -> Result<DeliveryReceipt, RelayError> {
        Err(RelayError::NotConfigured)
    }
}

/// Builds the notification mail: plain text plus an escaped HTML alternative,
/// sent "from" the visitor with a matching Reply-To.
pub fn build_message(values: &ContactFormValues, receiver: &Mailbox) -> Result<Message, RelayError> {
    let name = values.name.trim();
    let sender_address: Address = values.email.trim().parse().map_err(|e| RelayError::Address {
        address: values.email.clone(),
        reason: format!("{e}"),
    })?;
    let sender = Mailbox::new(Some(name.to_string()), sender_address);

    let text = format!(
        "Name: {}\nEmail: {}\nMessage: {}\n\nReceived: {}",
        name,
        values.email.trim(),
        values.message,
        Utc::now().to_rfc3339()
    );
    let html = html_body(values);

    let message = Message::builder()
        .from(sender.clone())
        .reply_to(sender)
        .to(receiver.clone())
        .subject(format!("New Contact Form Submission from {name}"))
        .multipart(MultiPart::alternative_plain_html(text, html))?;

    Ok(message)
}

fn html_body(values: &ContactFormValues) -> String {
    format!(
        "<p><b>Name:</b> {}</p><p><b>Email:</b> {}</p><p><b>Message:</b><br/>{}</p>",
        escape_html(values.name.trim()),
        escape_html(values.email.trim()),
        escape_html(&values.message).replace('\n', "<br/>")
    )
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, RelayError> {
    raw.trim().parse::<Mailbox>().map_err(|e| RelayError::Address {
        address: raw.to_string(),
        reason: format!("{e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receiver() -> Mailbox {
        parse_mailbox("owner@example.com").unwrap()
    }

    fn formatted(message: &Message) -> String {
        String::from_utf8_lossy(&message.formatted()).into_owned()
    }

    #[test]
    fn test_message_headers() {
        let values = ContactFormValues::new(
            "Jane Doe",
            "jane@example.com",
            "This is a sufficiently long message.",
        );
        let message = build_message(&values, &receiver()).unwrap();
        let raw = formatted(&message);

        assert!(raw.contains("Subject: New Contact Form Submission from Jane Doe"));
        assert!(raw.contains("To: owner@example.com"));
        assert!(raw.contains("jane@example.com"));
        assert!(raw.contains("Reply-To:"));
    }

    #[test]
    fn test_html_body_is_escaped() {
        let values = ContactFormValues::new(
            "Mallory",
            "mallory@example.com",
            "<script>alert('pwned')</script>",
        );
        let html = html_body(&values);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_invalid_sender_is_an_address_error() {
        let values = ContactFormValues::new("Jane", "not-an-address", "long enough message");
        assert!(matches!(
            build_message(&values, &receiver()),
            Err(RelayError::Address { .. })
        ));
    }

    #[test]
    fn test_invalid_receiver_is_rejected_at_construction() {
        let config = SmtpConfig {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "relay".to_string(),
            password: "secret".to_string(),
            receiver: "nobody".to_string(),
        };
        assert!(matches!(
            SmtpRelay::from_config(&config),
            Err(RelayError::Address { .. })
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_relay_fails_without_panicking() {
        let values = ContactFormValues::new("Jane", "jane@example.com", "hello there, friend");
        let err = UnconfiguredRelay.deliver(&values).await.unwrap_err();
        assert!(matches!(err, RelayError::NotConfigured));
    }
}
