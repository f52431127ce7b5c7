// Cross-cutting prompt fragments. Feature modules keep their own prompts.rs.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Keeps the model inside the page's data contract.
pub const SHAPE_INSTRUCTION: &str = "\
    CRITICAL: The content you return must keep EXACTLY the same JSON shape as the \
    content you were given: the same sections, the same field names, no added or \
    removed fields. Skill levels are integers from 0 to 100. Project ids must stay \
    unique. Content that breaks this shape is discarded.";
