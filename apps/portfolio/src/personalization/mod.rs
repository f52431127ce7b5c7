// Content personalization: turns interaction signals plus the current page
// copy into a rewritten ContentRecord via the LLM.
// All model calls go through llm_client; nothing here talks to the provider.

use serde::{Deserialize, Serialize};

pub mod flow;
pub mod handlers;
pub mod prompts;

/// Request body of the personalization call. Both fields are JSON documents
/// encoded as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizeContentInput {
    /// JSON-encoded `InteractionSnapshot`.
    pub interaction_data: String,
    /// JSON-encoded `ContentRecord`.
    pub current_content: String,
}

/// Response body of the personalization call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizeContentOutput {
    /// JSON-encoded `ContentRecord`. Callers must decode and validate it.
    pub personalized_content: String,
    pub reasoning: String,
}

/// What the page observed before asking for personalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InteractionSnapshot {
    /// Fraction of the page scrolled, 0.0-1.0.
    pub scroll_depth: f64,
    pub clicks: u32,
    /// Milliseconds since the page session started.
    pub time_on_page: f64,
}

impl InteractionSnapshot {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.scroll_depth) {
            return Err(format!(
                "scrollDepth must be between 0 and 1, got {}",
                self.scroll_depth
            ));
        }
        if !self.time_on_page.is_finite() || self.time_on_page < 0.0 {
            return Err(format!(
                "timeOnPage must be a non-negative number of milliseconds, got {}",
                self.time_on_page
            ));
        }
        Ok(())
    }
}
