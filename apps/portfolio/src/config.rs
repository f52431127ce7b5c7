use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::session::DEFAULT_TRIGGER_THRESHOLD;

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_PORT: u16 = 8080;

/// Application configuration loaded from environment variables.
///
/// Nothing here is required and nothing here stops startup: a missing model
/// key disables personalization, missing SMTP settings turn every contact
/// submission into a delivery failure, and a malformed number falls back to
/// its default (recorded in `fallbacks` so `main` can log it once tracing
/// is up).
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub smtp: Option<SmtpConfig>,
    pub pgp_key_path: PathBuf,
    pub personalization_threshold: u32,
    pub port: u16,
    pub rust_log: String,
    pub fallbacks: Vec<ConfigFallback>,
}

/// Mail relay settings. Only built when every field is present.
#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub receiver: String,
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("receiver", &self.receiver)
            .finish()
    }
}

/// A variable that was set but could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFallback {
    pub key: &'static str,
    pub raw: String,
    pub default: String,
}

impl fmt::Display for ConfigFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} has an invalid value '{}', using {}",
            self.key, self.raw, self.default
        )
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(optional_env)
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut fallbacks = Vec::new();

        Config {
            anthropic_api_key: lookup("ANTHROPIC_API_KEY"),
            smtp: smtp_from_lookup(&lookup, &mut fallbacks),
            pgp_key_path: lookup("PGP_KEY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("public/pgp-key.txt")),
            personalization_threshold: parse_or_default(
                &lookup,
                "PERSONALIZATION_THRESHOLD",
                DEFAULT_TRIGGER_THRESHOLD,
                &mut fallbacks,
            ),
            port: parse_or_default(&lookup, "PORT", DEFAULT_PORT, &mut fallbacks),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            fallbacks,
        }
    }
}

fn smtp_from_lookup<F>(lookup: &F, fallbacks: &mut Vec<ConfigFallback>) -> Option<SmtpConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup("SMTP_HOST")?;
    let username = lookup("SMTP_USER")?;
    let password = lookup("SMTP_PASS")?;
    let receiver = lookup("CONTACT_RECEIVER_EMAIL")?;

    Some(SmtpConfig {
        host,
        port: parse_or_default(lookup, "SMTP_PORT", DEFAULT_SMTP_PORT, fallbacks),
        username,
        password,
        receiver,
    })
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_or_default<F, T>(
    lookup: &F,
    key: &'static str,
    default: T,
    fallbacks: &mut Vec<ConfigFallback>,
) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            fallbacks.push(ConfigFallback {
                key,
                raw,
                default: default.to_string(),
            });
            default
        }
    }
}
