use super::{PersonalizedResponse, RecommendationItem};

pub const LOADING_CAPTION: &str = "Loading recommendations...";
pub const EMPTY_MESSAGE: &str =
    "No recommendations yet. Borrow some books or search for titles to get personalized suggestions!";
pub const LOAD_ERROR_MESSAGE: &str = "Could not load recommendations. Try again later.";

/// What a recommendation container currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Populated(Vec<RecommendationItem>),
    Empty,
    Error(String),
}

impl LoadState {
    /// Maps a parsed personalization response onto the state to render
    ///
    /// Anything other than a successful, non-empty result list renders as empty,
    /// including `success: false` bodies (e.g. an unauthenticated session).
    pub fn from_response(response: PersonalizedResponse) -> Self {
        let success = response.success;
        let results = response.into_results();

        if success && !results.is_empty() {
            LoadState::Populated(results)
        } else {
            LoadState::Empty
        }
    }

    /// The error state with its fixed user-facing message
    pub fn failed() -> Self {
        LoadState::Error(LOAD_ERROR_MESSAGE.to_string())
    }

    pub fn kind(&self) -> LoadStateKind {
        match self {
            LoadState::Loading => LoadStateKind::Loading,
            LoadState::Populated(_) => LoadStateKind::Populated,
            LoadState::Empty => LoadStateKind::Empty,
            LoadState::Error(_) => LoadStateKind::Error,
        }
    }
}

/// Payload-free discriminant of [`LoadState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStateKind {
    Loading,
    Populated,
    Empty,
    Error,
}

impl LoadStateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LoadStateKind::Loading => "loading",
            LoadStateKind::Populated => "populated",
            LoadStateKind::Empty => "empty",
            LoadStateKind::Error => "error",
        }
    }
}

impl std::fmt::Display for LoadStateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
