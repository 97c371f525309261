use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! name_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

name_newtype!(UserId);

pub const GUEST_USER_ID: &str = "guest";

impl UserId {
    pub fn guest() -> Self {
        Self::new(GUEST_USER_ID)
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::guest()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Category,
    Pricing,
}

/// Filter values offered by the service, in the order it lists them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCatalog {
    pub categories: Vec<String>,
    pub pricing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    pub summary: String,
    pub pricing: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestToolRecommendation {
    pub name: String,
    pub reason: String,
}

pub const NO_SUMMARY_TEXT: &str = "No summary available.";
pub const QUERY_FAILED_TEXT: &str = "Error fetching response. Please try again.";

/// The complete displayed result of one chat query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationView {
    pub summary: String,
    pub best: Option<BestToolRecommendation>,
    pub tools: Vec<ToolSummary>,
    #[serde(default)]
    pub is_error: bool,
}

impl RecommendationView {
    pub fn query_failed() -> Self {
        Self {
            summary: QUERY_FAILED_TEXT.to_string(),
            best: None,
            tools: Vec::new(),
            is_error: true,
        }
    }

    pub fn tool(&self, name: &str) -> Option<&ToolSummary> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    /// Nothing to show beyond the summary.
    pub fn has_no_tools(&self) -> bool {
        self.tools.is_empty() && self.best.is_none()
    }
}
