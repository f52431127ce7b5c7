// Contact delivery: field rules, the mail relay boundary and the route that
// ties them together.

use serde::{Deserialize, Serialize};

pub mod form;
pub mod handlers;
pub mod relay;

/// Body of every `/api/contact` response. `success: false` always carries
/// an `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ContactResponse {
    pub fn delivered(info: serde_json::Value) -> Self {
        Self {
            success: true,
            info: Some(info),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            info: None,
            error: Some(error.into()),
        }
    }
}
