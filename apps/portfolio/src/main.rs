use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use portfolio::config::Config;
use portfolio::contact::relay::{MailRelay, SmtpRelay, UnconfiguredRelay};
use portfolio::llm_client::LlmClient;
use portfolio::personalization::flow::{
    ContentGenerator, LlmContentGenerator, UnconfiguredGenerator,
};
use portfolio::routes::build_router;
use portfolio::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portfolio v{}", env!("CARGO_PKG_VERSION"));
    for fallback in &config.fallbacks {
        warn!("{fallback}");
    }

    let generator: Arc<dyn ContentGenerator> = match &config.anthropic_api_key {
        Some(key) => match LlmClient::new(key.clone()) {
            Ok(llm) => {
                info!("LLM client initialized (model: {})", llm.settings().model);
                Arc::new(LlmContentGenerator::new(llm))
            }
            Err(e) => {
                warn!("LLM client could not be built, personalization is disabled: {e}");
                Arc::new(UnconfiguredGenerator)
            }
        },
        None => {
            warn!("ANTHROPIC_API_KEY is not set; personalization is disabled");
            Arc::new(UnconfiguredGenerator)
        }
    };

    let mail_relay: Arc<dyn MailRelay> = match &config.smtp {
        Some(smtp) => match SmtpRelay::from_config(smtp) {
            Ok(relay) => {
                info!("SMTP relay configured ({}:{})", smtp.host, smtp.port);
                Arc::new(relay)
            }
            Err(e) => {
                warn!("SMTP relay could not be configured, contact delivery disabled: {e}");
                Arc::new(UnconfiguredRelay)
            }
        },
        None => {
            warn!(
                "SMTP_HOST, SMTP_USER, SMTP_PASS and CONTACT_RECEIVER_EMAIL are not all set; \
                 contact submissions will fail"
            );
            Arc::new(UnconfiguredRelay)
        }
    };

    info!(
        "Personalization threshold: {} interactions, PGP key at {}",
        config.personalization_threshold,
        config.pgp_key_path.display()
    );

    let state = AppState {
        config: config.clone(),
        generator,
        mail_relay,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the deployed site domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
