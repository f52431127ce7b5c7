//! HTTP clients for the two server calls a page session makes.

use async_trait::async_trait;
use reqwest::Client;

use crate::contact::form::ContactFormValues;
use crate::contact::ContactResponse;
use crate::content::ContentRecord;
use crate::personalization::flow::PersonalizedPage;
use crate::personalization::{PersonalizeContentInput, PersonalizeContentOutput};
use crate::session::contact_form::{ContactTransport, TransportError};
use crate::session::{PersonalizationError, Personalizer};

pub const PERSONALIZE_PATH: &str = "/api/personalize";
pub const CONTACT_PATH: &str = "/api/contact";

/// Calls `POST /api/personalize` and re-validates what comes back.
#[derive(Clone)]
pub struct HttpPersonalizer {
    client: Client,
    endpoint: String,
}

impl HttpPersonalizer {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: join(base_url, PERSONALIZE_PATH),
        }
    }
}

#[async_trait]
impl Personalizer for HttpPersonalizer {
    async fn personalize(
        &self,
        request: &PersonalizeContentInput,
    ) -> Result<PersonalizedPage, PersonalizationError> {
        let response = self.client.post(&self.endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PersonalizationError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let output: PersonalizeContentOutput = serde_json::from_slice(&body)?;
        let content = ContentRecord::from_json(&output.personalized_content)?;

        Ok(PersonalizedPage {
            content,
            reasoning: output.reasoning,
        })
    }
}

/// Calls `POST /api/contact`. Non-2xx or `success: false` is a failure; the
/// endpoint's `error` text is carried along when present.
#[derive(Clone)]
pub struct HttpContactTransport {
    client: Client,
    endpoint: String,
}

impl HttpContactTransport {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: join(base_url, CONTACT_PATH),
        }
    }
}

#[async_trait]
impl ContactTransport for HttpContactTransport {
    async fn send(&self, values: &ContactFormValues) -> Result<(), TransportError> {
        let response = self.client.post(&self.endpoint).json(values).send().await?;

        let status = response.status();
        let body = response.bytes().await?;
        let parsed = serde_json::from_slice::<ContactResponse>(&body).ok();

        match parsed {
            Some(ContactResponse { success: true, .. }) if status.is_success() => Ok(()),
            other => Err(TransportError::Delivery {
                status: status.as_u16(),
                reason: other.and_then(|r| r.error),
            }),
        }
    }
}

fn join(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_handles_trailing_slash() {
        assert_eq!(
            join("http://localhost:8080/", CONTACT_PATH),
            "http://localhost:8080/api/contact"
        );
        assert_eq!(
            join("http://localhost:8080", PERSONALIZE_PATH),
            "http://localhost:8080/api/personalize"
        );
    }
}
