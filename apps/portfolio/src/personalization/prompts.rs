// Prompt constants for content personalization.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for personalization. `{json_only}` is filled from llm_client.
pub const PERSONALIZE_SYSTEM_TEMPLATE: &str = "You are an AI-powered web content personalization expert. \
    You analyze visitor interaction data and adjust website content to match the visitor's interests. \
    {json_only}";

/// Personalization prompt. Replace `{interaction_data}`, `{current_content}`
/// and `{shape_instruction}` before sending.
pub const PERSONALIZE_PROMPT_TEMPLATE: &str = r#"Here's the visitor interaction data:
{interaction_data}

Here's the current website content:
{current_content}

Based on the interaction data, personalize the website content to better engage the visitor.
Focus on highlighting information most relevant to their interests and improve the overall
experience. Explain each adjustment in the reasoning.

{shape_instruction}

Return a JSON object with this EXACT schema (no extra fields):
{
  "personalizedContent": "<the personalized content, encoded as a JSON string>",
  "reasoning": "<why each change was made for this visitor>"
}

The value of "personalizedContent" is a STRING containing valid JSON, not a nested object."#;
