//! Typed access to the recommendation service.
//!
//! Every response body passes through one normalization step per endpoint
//! before it reaches the orchestrator: optional fields that are missing or
//! malformed collapse to empty/absent values, while malformed required
//! fields become [`GatewayError::MalformedResponse`].

use std::collections::HashSet;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{Map, Value};
use shared::{
    domain::{
        BestToolRecommendation, FilterCatalog, RecommendationView, ToolSummary, UserId,
        NO_SUMMARY_TEXT,
    },
    error::ServiceErrorBody,
    protocol::{
        ChatRequest, ClickRequest, PersonaQuery, CHAT_PATH, CLICK_PATH, FILTERS_PATH,
        PERSONA_PATH,
    },
};
use thiserror::Error;
use tracing::debug;

use crate::config::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    MalformedResponse,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{endpoint}: request failed: {reason}")]
    Transport {
        endpoint: &'static str,
        reason: String,
    },
    #[error("{endpoint}: service returned status {status}: {message}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: String,
    },
    #[error("{endpoint}: malformed response: {reason}")]
    MalformedResponse {
        endpoint: &'static str,
        reason: String,
    },
}

impl GatewayError {
    fn transport(endpoint: &'static str, err: reqwest::Error) -> Self {
        Self::Transport {
            endpoint,
            reason: err.to_string(),
        }
    }

    fn malformed(endpoint: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            endpoint,
            reason: reason.into(),
        }
    }

    /// Non-success statuses count as transport failures.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Transport { .. } | Self::Status { .. } => FailureKind::Transport,
            Self::MalformedResponse { .. } => FailureKind::MalformedResponse,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Transport { endpoint, .. }
            | Self::Status { endpoint, .. }
            | Self::MalformedResponse { endpoint, .. } => endpoint,
        }
    }
}

/// Normalized result of a chat query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatOutcome {
    pub view: RecommendationView,
    pub updated_persona: Option<String>,
}

#[async_trait]
pub trait RecommendationGateway: Send + Sync {
    async fn fetch_filters(&self) -> Result<FilterCatalog, GatewayError>;
    async fn fetch_persona(&self, user_id: &UserId) -> Result<String, GatewayError>;
    /// Reports a click and returns the persona the service derived from it.
    async fn record_click(&self, request: ClickRequest) -> Result<String, GatewayError>;
    async fn chat(&self, request: ChatRequest) -> Result<ChatOutcome, GatewayError>;
}

pub struct HttpGateway {
    http: Client,
    service_url: String,
}

impl HttpGateway {
    pub fn new(service_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), service_url)
    }

    pub fn with_client(http: Client, service_url: impl Into<String>) -> Self {
        Self {
            http,
            service_url: service_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("failed to build http client")?;
        Ok(Self::with_client(http, settings.service_url.clone()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.service_url)
    }

    async fn send_json(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<Value, GatewayError> {
        let response = request
            .send()
            .await
            .map_err(|err| GatewayError::transport(endpoint, err))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| GatewayError::transport(endpoint, err))?;
        debug!(endpoint, status = status.as_u16(), "gateway: response received");

        if !status.is_success() {
            let message = ServiceErrorBody::parse(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown status")
                    .to_string()
            });
            return Err(GatewayError::Status {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body)
            .map_err(|err| GatewayError::malformed(endpoint, format!("invalid json body: {err}")))
    }
}

#[async_trait]
impl RecommendationGateway for HttpGateway {
    async fn fetch_filters(&self) -> Result<FilterCatalog, GatewayError> {
        let body = self
            .send_json(FILTERS_PATH, self.http.get(self.url(FILTERS_PATH)))
            .await?;
        normalize_filters(&body)
    }

    async fn fetch_persona(&self, user_id: &UserId) -> Result<String, GatewayError> {
        let request = self
            .http
            .get(self.url(PERSONA_PATH))
            .query(&PersonaQuery {
                user_id: user_id.clone(),
            });
        let body = self.send_json(PERSONA_PATH, request).await?;
        normalize_persona(&body)
    }

    async fn record_click(&self, request: ClickRequest) -> Result<String, GatewayError> {
        let request = self.http.post(self.url(CLICK_PATH)).json(&request);
        let body = self.send_json(CLICK_PATH, request).await?;
        normalize_click(&body)
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatOutcome, GatewayError> {
        let request = self.http.post(self.url(CHAT_PATH)).json(&request);
        let body = self.send_json(CHAT_PATH, request).await?;
        normalize_chat(&body)
    }
}

pub fn normalize_filters(body: &Value) -> Result<FilterCatalog, GatewayError> {
    let object = as_object(FILTERS_PATH, body)?;
    Ok(FilterCatalog {
        categories: string_list(object.get("categories")),
        pricing: string_list(object.get("pricing")),
    })
}

pub fn normalize_persona(body: &Value) -> Result<String, GatewayError> {
    required_string(PERSONA_PATH, as_object(PERSONA_PATH, body)?, "persona")
}

pub fn normalize_click(body: &Value) -> Result<String, GatewayError> {
    required_string(CLICK_PATH, as_object(CLICK_PATH, body)?, "updated_persona")
}

pub fn normalize_chat(body: &Value) -> Result<ChatOutcome, GatewayError> {
    let object = as_object(CHAT_PATH, body)?;

    let view = match object.get("ai_tool_recommendation") {
        None | Some(Value::Null) => normalize_recommendation(&Map::new()),
        Some(Value::Object(recommendation)) => normalize_recommendation(recommendation),
        Some(_) => {
            return Err(GatewayError::malformed(
                CHAT_PATH,
                "ai_tool_recommendation is not an object",
            ))
        }
    };

    let updated_persona = match object.get("updated_persona") {
        None | Some(Value::Null) => None,
        Some(Value::String(persona)) => Some(persona.clone()),
        Some(_) => {
            return Err(GatewayError::malformed(
                CHAT_PATH,
                "updated_persona is not a string",
            ))
        }
    };

    Ok(ChatOutcome {
        view,
        updated_persona,
    })
}

fn normalize_recommendation(recommendation: &Map<String, Value>) -> RecommendationView {
    let summary = recommendation
        .get("summary")
        .and_then(Value::as_str)
        .filter(|summary| !summary.is_empty())
        .unwrap_or(NO_SUMMARY_TEXT)
        .to_string();

    let tools = match recommendation.get("tools") {
        Some(Value::Array(items)) => normalize_tools(items),
        _ => Vec::new(),
    };

    RecommendationView {
        summary,
        best: recommendation.get("best_tool").and_then(normalize_best_tool),
        tools,
        is_error: false,
    }
}

fn normalize_best_tool(value: &Value) -> Option<BestToolRecommendation> {
    let object = value.as_object()?;
    let name = object.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    Some(BestToolRecommendation {
        name: name.to_string(),
        reason: optional_string(object, "reason"),
    })
}

// Entries without a usable name are dropped; the first entry wins on duplicate names.
fn normalize_tools(items: &[Value]) -> Vec<ToolSummary> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|item| {
            let name = item.get("name")?.as_str()?.trim();
            if name.is_empty() || !seen.insert(name.to_string()) {
                return None;
            }
            Some(ToolSummary {
                name: name.to_string(),
                summary: optional_string(item, "summary"),
                pricing: optional_string(item, "pricing"),
            })
        })
        .collect()
}

fn as_object<'a>(
    endpoint: &'static str,
    body: &'a Value,
) -> Result<&'a Map<String, Value>, GatewayError> {
    body.as_object()
        .ok_or_else(|| GatewayError::malformed(endpoint, "body is not a json object"))
}

fn required_string(
    endpoint: &'static str,
    object: &Map<String, Value>,
    field: &str,
) -> Result<String, GatewayError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| GatewayError::malformed(endpoint, format!("missing string field '{field}'")))
}

fn optional_string(object: &Map<String, Value>, field: &str) -> String {
    object
        .get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
