use serde::{Deserialize, Serialize};

pub mod book;
pub mod load_state;

pub use book::{Availability, RecommendationItem};
pub use load_state::{LoadState, LoadStateKind};

// ============================================================================
// Library Application API Types
// ============================================================================

/// Body of `POST /api/recommendations/personalized`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonalizedRequest {
    #[serde(rename = "recentISBNs")]
    pub recent_isbns: Vec<String>,
}

/// Response of `POST /api/recommendations/personalized`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PersonalizedResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub results: Option<Vec<RecommendationItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PersonalizedResponse {
    /// A successful response carrying `results`
    pub fn with_results(results: Vec<RecommendationItem>) -> Self {
        Self {
            success: true,
            count: Some(results.len()),
            results: Some(results),
            message: None,
        }
    }

    pub fn into_results(self) -> Vec<RecommendationItem> {
        self.results.unwrap_or_default()
    }
}

/// An action a reader can take from a recommendation card
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookAction {
    Issue,
    Reserve,
}

impl BookAction {
    pub fn as_str(self) -> &'static str {
        match self {
            BookAction::Issue => "issue",
            BookAction::Reserve => "reserve",
        }
    }
}

impl std::fmt::Display for BookAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/issue` and `POST /api/reserve`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookActionRequest {
    pub isbn: String,
}

/// Result of an issue or reserve call as reported by the library application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
