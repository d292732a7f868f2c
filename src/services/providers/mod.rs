/// Library application abstractions
///
/// The recommendation loader talks to the personalization endpoint through
/// [`RecommendationProvider`], and card controls reach the library's
/// issue/reserve endpoints through [`BookActions`]. `LibraryApiClient`
/// implements both over HTTP; tests substitute their own implementations.
///
/// The library application authenticates readers with its own session, so the
/// HTTP service obtains per-reader clients from a [`LibraryConnector`].
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{ActionOutcome, PersonalizedResponse},
};

pub mod library_api;
pub mod session;

pub use library_api::LibraryApiClient;
pub use session::LibrarySession;

/// Source of personalized recommendations
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationProvider: Send + Sync {
    /// Ranks books for a reader given their recently viewed ISBNs (most recent first)
    ///
    /// Exactly one request per call; no retries.
    async fn personalized(&self, recent_isbns: &[String]) -> AppResult<PersonalizedResponse>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Circulation actions exposed on recommendation cards
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BookActions: Send + Sync {
    async fn issue_book(&self, isbn: &str) -> AppResult<ActionOutcome>;

    async fn reserve_book(&self, isbn: &str) -> AppResult<ActionOutcome>;
}

/// Hands out library clients acting for one reader's session
pub trait LibraryConnector: Send + Sync {
    fn provider(&self, session: &LibrarySession) -> Arc<dyn RecommendationProvider>;

    fn actions(&self, session: &LibrarySession) -> Arc<dyn BookActions>;
}

/// Connector for a backend that needs no reader credential
#[derive(Clone)]
pub struct SharedLibrary {
    provider: Arc<dyn RecommendationProvider>,
    actions: Arc<dyn BookActions>,
}

impl SharedLibrary {
    pub fn new(provider: Arc<dyn RecommendationProvider>, actions: Arc<dyn BookActions>) -> Self {
        Self { provider, actions }
    }
}

impl LibraryConnector for SharedLibrary {
    fn provider(&self, _session: &LibrarySession) -> Arc<dyn RecommendationProvider> {
        self.provider.clone()
    }

    fn actions(&self, _session: &LibrarySession) -> Arc<dyn BookActions> {
        self.actions.clone()
    }
}
