//! JSON bodies exchanged with the recommendation service.

use serde::{Deserialize, Serialize};

use crate::domain::UserId;

pub const FILTERS_PATH: &str = "/api/filters";
pub const PERSONA_PATH: &str = "/api/persona";
pub const CLICK_PATH: &str = "/api/click";
pub const CHAT_PATH: &str = "/api/chat";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaQuery {
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickRequest {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl ClickRequest {
    pub fn category(user_id: UserId, category_name: impl Into<String>) -> Self {
        Self {
            user_id,
            category_name: Some(category_name.into()),
            tool_name: None,
        }
    }

    pub fn tool(user_id: UserId, tool_name: impl Into<String>) -> Self {
        Self {
            user_id,
            category_name: None,
            tool_name: Some(tool_name.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    pub categories: Vec<String>,
    pub pricing: Vec<String>,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersResponse {
    pub categories: Vec<String>,
    pub pricing: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaResponse {
    pub persona: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClickResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub updated_persona: String,
}
