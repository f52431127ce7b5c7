//! Contact submission state machine.
//!
//! `Idle → Validating → {Submitting → {Succeeded | Failed} | Rejected}`.
//! Nothing is retried automatically; after `Failed` or `Rejected` the visitor
//! edits the values (if needed) and calls `submit` again.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::contact::form::{ContactFormValues, FieldError};

pub const CONFIRMATION: &str = "Your encrypted message has been securely dispatched.";
const GENERIC_FAILURE: &str = "Transmission failed. Please try again.";

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered but did not accept the message.
    #[error("delivery failed (status {status})")]
    Delivery { status: u16, reason: Option<String> },
}

impl TransportError {
    /// The reason reported by the delivery endpoint, if it gave one.
    pub fn reported_reason(&self) -> Option<&str> {
        match self {
            TransportError::Delivery {
                reason: Some(reason),
                ..
            } if !reason.trim().is_empty() => Some(reason),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ContactTransport: Send + Sync {
    async fn send(&self, values: &ContactFormValues) -> Result<(), TransportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactState {
    Idle,
    Validating,
    Submitting,
    Succeeded { confirmation: String },
    Failed { reason: String },
    Rejected { errors: Vec<FieldError> },
}

impl ContactState {
    /// Text to show the visitor for terminal states.
    pub fn user_message(&self) -> Option<String> {
        match self {
            ContactState::Succeeded { confirmation } => Some(confirmation.clone()),
            ContactState::Failed { reason } => Some(format!("Transmission failed: {reason}")),
            ContactState::Rejected { errors } => Some(
                errors
                    .iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => None,
        }
    }
}

pub struct ContactForm {
    values: ContactFormValues,
    state: ContactState,
    transport: Arc<dyn ContactTransport>,
}

impl ContactForm {
    pub fn new(transport: Arc<dyn ContactTransport>) -> Self {
        Self {
            values: ContactFormValues::default(),
            state: ContactState::Idle,
            transport,
        }
    }

    pub fn values(&self) -> &ContactFormValues {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut ContactFormValues {
        &mut self.values
    }

    pub fn set_values(&mut self, values: ContactFormValues) {
        self.values = values;
    }

    pub fn state(&self) -> &ContactState {
        &self.state
    }

    /// Runs one submission attempt to a terminal state.
    pub async fn submit(&mut self) -> &ContactState {
        self.state = ContactState::Validating;

        if let Err(errors) = self.values.validate() {
            self.state = ContactState::Rejected { errors };
            return &self.state;
        }

        self.state = ContactState::Submitting;

        self.state = match self.transport.send(&self.values).await {
            Ok(()) => {
                info!("Contact form delivered");
                self.values.clear();
                ContactState::Succeeded {
                    confirmation: CONFIRMATION.to_string(),
                }
            }
            Err(e) => {
                warn!("Contact form submission failed: {e}");
                ContactState::Failed {
                    reason: e
                        .reported_reason()
                        .map(str::to_string)
                        .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
                }
            }
        };

        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::form::{ContactField, MESSAGE_TOO_SHORT};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Transport that records what it was asked to send and replays a result.
    struct FakeTransport {
        sent: Mutex<Vec<ContactFormValues>>,
        calls: AtomicUsize,
        reply: Option<Option<String>>,
    }

    impl FakeTransport {
        fn accepting() -> Arc<Self> {
            Self::with_reply(None)
        }

        fn failing(reason: Option<&str>) -> Arc<Self> {
            Self::with_reply(Some(reason.map(str::to_string)))
        }

        fn with_reply(reply: Option<Option<String>>) -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
                reply,
            })
        }
    }

    #[async_trait]
    impl ContactTransport for FakeTransport {
        async fn send(&self, values: &ContactFormValues) -> Result<(), TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sent.lock().unwrap().push(values.clone());
            match &self.reply {
                None => Ok(()),
                Some(reason) => Err(TransportError::Delivery {
                    status: 500,
                    reason: reason.clone(),
                }),
            }
        }
    }

    fn valid_values() -> ContactFormValues {
        ContactFormValues::new(
            "Jane Doe",
            "jane@example.com",
            "This is a sufficiently long message.",
        )
    }

    #[tokio::test]
    async fn test_invalid_values_are_rejected_without_sending() {
        let transport = FakeTransport::accepting();
        let mut form = ContactForm::new(transport.clone());
        form.set_values(ContactFormValues::new("A", "x@y.com", "short"));

        let state = form.submit().await.clone();

        match state {
            ContactState::Rejected { errors } => {
                assert!(errors
                    .iter()
                    .any(|e| e.field == ContactField::Message && e.message == MESSAGE_TOO_SHORT));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
        assert_eq!(form.values().name, "A");
    }

    #[tokio::test]
    async fn test_success_clears_fields() {
        let transport = FakeTransport::accepting();
        let mut form = ContactForm::new(transport.clone());
        form.set_values(valid_values());

        let state = form.submit().await.clone();

        assert_eq!(
            state,
            ContactState::Succeeded {
                confirmation: CONFIRMATION.to_string()
            }
        );
        assert!(form.values().is_empty());
        assert_eq!(transport.sent.lock().unwrap()[0], valid_values());
    }

    #[tokio::test]
    async fn test_failure_surfaces_reason_and_keeps_fields() {
        let mut form = ContactForm::new(FakeTransport::failing(Some("SMTP timeout")));
        form.set_values(valid_values());

        let state = form.submit().await.clone();

        assert_eq!(
            state,
            ContactState::Failed {
                reason: "SMTP timeout".to_string()
            }
        );
        assert!(state.user_message().unwrap().contains("SMTP timeout"));
        assert_eq!(form.values(), &valid_values());
    }

    #[tokio::test]
    async fn test_failure_without_reason_uses_generic_message() {
        let mut form = ContactForm::new(FakeTransport::failing(None));
        form.set_values(valid_values());

        let state = form.submit().await.clone();

        assert_eq!(
            state,
            ContactState::Failed {
                reason: GENERIC_FAILURE.to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_resubmission_after_failure_is_explicit() {
        let transport = FakeTransport::failing(Some("SMTP timeout"));
        let mut form = ContactForm::new(transport.clone());
        form.set_values(valid_values());

        form.submit().await;
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        form.submit().await;
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_rejected_then_corrected() {
        let mut form = ContactForm::new(FakeTransport::accepting());
        form.set_values(ContactFormValues::new("Jane Doe", "jane@", "This is long enough."));
        assert!(matches!(form.submit().await, ContactState::Rejected { .. }));

        form.values_mut().email = "jane@example.com".to_string();
        assert!(matches!(form.submit().await, ContactState::Succeeded { .. }));
    }
}
