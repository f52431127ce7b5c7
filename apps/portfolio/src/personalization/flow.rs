//! Personalization flow: asks the model for new copy and refuses anything
//! that is not a well-formed ContentRecord.
//!
//! Flow: build prompt → `ContentGenerator::generate` → decode
//! `personalizedContent` → shape check → adopt.
//!
//! `AppState` holds an `Arc<dyn ContentGenerator>`; `LlmContentGenerator` is
//! the production backend, `UnconfiguredGenerator` stands in when no API key
//! is set.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{error, info};

use crate::content::{ContentRecord, ContentShapeError};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, SHAPE_INSTRUCTION};
use crate::llm_client::{LlmClient, LlmError};
use crate::personalization::prompts::{PERSONALIZE_PROMPT_TEMPLATE, PERSONALIZE_SYSTEM_TEMPLATE};
use crate::personalization::{PersonalizeContentInput, PersonalizeContentOutput};

#[derive(Debug, Error)]
pub enum PersonalizeError {
    #[error("personalization is not configured")]
    NotConfigured,

    #[error("generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("model returned no personalized content")]
    EmptyContent,

    #[error("personalized content rejected: {0}")]
    Shape(#[from] ContentShapeError),
}

/// Backend that produces personalized copy. Implement this to swap models
/// without touching the route or the validation around it.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        input: &PersonalizeContentInput,
    ) -> Result<PersonalizeContentOutput, PersonalizeError>;
}

/// Production generator backed by the Anthropic Messages API.
pub struct LlmContentGenerator {
    llm: LlmClient,
}

impl LlmContentGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate(
        &self,
        input: &PersonalizeContentInput,
    ) -> Result<PersonalizeContentOutput, PersonalizeError> {
        let system = PERSONALIZE_SYSTEM_TEMPLATE.replace("{json_only}", JSON_ONLY_SYSTEM);
        let prompt = build_personalize_prompt(input);
        let output = self
            .llm
            .call_json::<PersonalizeContentOutput>(&prompt, &system)
            .await?;
        Ok(output)
    }
}

/// Used when no model credentials are configured. Every call fails, which
/// the caller sees as "no personalization available".
pub struct UnconfiguredGenerator;

#[async_trait]
impl ContentGenerator for UnconfiguredGenerator {
    async fn generate(
        &self,
        _input: &PersonalizeContentInput,
    ) -> Result<PersonalizeContentOutput, PersonalizeError> {
        Err(PersonalizeError::NotConfigured)
    }
}

/// A decoded, validated personalization result.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalizedPage {
    pub content: ContentRecord,
    pub reasoning: String,
}

/// Runs the raw generation step. The output is unvalidated model text.
pub async fn personalize_content(
    input: &PersonalizeContentInput,
    generator: &dyn ContentGenerator,
) -> Result<PersonalizeContentOutput, PersonalizeError> {
    generator.generate(input).await
}

/// Generates and validates personalized copy.
///
/// Every failure (generation error, malformed JSON, wrong shape) is logged
/// and collapses to `None`; the caller keeps its current content.
pub async fn personalize_page_content(
    input: &PersonalizeContentInput,
    generator: &dyn ContentGenerator,
) -> Option<PersonalizedPage> {
    match try_personalize(input, generator).await {
        Ok(page) => {
            info!(
                "Personalized content accepted ({} skills, {} projects)",
                page.content.skills.skillset.len(),
                page.content.projects.project_list.len()
            );
            Some(page)
        }
        Err(e) => {
            error!("AI personalization failed: {e}");
            None
        }
    }
}

async fn try_personalize(
    input: &PersonalizeContentInput,
    generator: &dyn ContentGenerator,
) -> Result<PersonalizedPage, PersonalizeError> {
    let output = personalize_content(input, generator).await?;

    let encoded = output.personalized_content.trim();
    if encoded.is_empty() {
        return Err(PersonalizeError::EmptyContent);
    }

    let content = ContentRecord::from_json(encoded)?;

    Ok(PersonalizedPage {
        content,
        reasoning: output.reasoning,
    })
}

fn build_personalize_prompt(input: &PersonalizeContentInput) -> String {
    PERSONALIZE_PROMPT_TEMPLATE
        .replace("{shape_instruction}", SHAPE_INSTRUCTION)
        .replace("{interaction_data}", &input.interaction_data)
        .replace("{current_content}", &input.current_content)
}
