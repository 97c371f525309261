use serde::{Deserialize, Serialize};

/// Body the service returns alongside a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}

impl ServiceErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    /// Extracts the service's message from a raw error body, if it has one.
    pub fn parse(raw: &str) -> Option<String> {
        serde_json::from_str::<Self>(raw)
            .ok()
            .map(|body| body.error)
            .filter(|message| !message.trim().is_empty())
    }
}
