use std::sync::Arc;

use crate::config::Config;
use crate::contact::relay::MailRelay;
use crate::personalization::flow::ContentGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable personalization backend. Default: LlmContentGenerator when
    /// ANTHROPIC_API_KEY is set, UnconfiguredGenerator otherwise.
    pub generator: Arc<dyn ContentGenerator>,
    /// SmtpRelay when SMTP is fully configured, UnconfiguredRelay otherwise.
    pub mail_relay: Arc<dyn MailRelay>,
}
