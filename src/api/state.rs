use std::sync::Arc;

use crate::config::Config;
use crate::render::RenderOptions;
use crate::services::{
    providers::{BookActions, LibraryConnector, LibrarySession, RecommendationProvider, SharedLibrary},
    recent_items::{RecencyTracker, MAX_RECENT, RECENT_BOOKS_KEY},
    recommendations::RecommendationLoader,
};
use crate::storage::{ScopedStore, SessionStore};
use crate::view::ContainerRegistry;

/// Widget settings shared by every session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetSettings {
    pub recent_key: String,
    pub max_recent: usize,
    pub render: RenderOptions,
    /// Library application cookie forwarded on a reader's behalf
    pub session_cookie: String,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            recent_key: RECENT_BOOKS_KEY.to_string(),
            max_recent: MAX_RECENT,
            render: RenderOptions::default(),
            session_cookie: "session".to_string(),
        }
    }
}

impl From<&Config> for WidgetSettings {
    fn from(config: &Config) -> Self {
        Self {
            recent_key: config.recent_key.clone(),
            max_recent: config.max_recent,
            render: RenderOptions {
                stagger_ms: config.card_stagger_ms,
            },
            session_cookie: config.library_session_cookie.clone(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionStore>,
    pub library: Arc<dyn LibraryConnector>,
    pub settings: WidgetSettings,
}

impl AppState {
    /// State over a backend that ignores reader sessions
    pub fn new(
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn RecommendationProvider>,
        actions: Arc<dyn BookActions>,
        settings: WidgetSettings,
    ) -> Self {
        Self::with_library(store, Arc::new(SharedLibrary::new(provider, actions)), settings)
    }

    /// State whose backend calls act for each reader's library session
    pub fn with_library(
        store: Arc<dyn SessionStore>,
        library: Arc<dyn LibraryConnector>,
        settings: WidgetSettings,
    ) -> Self {
        Self {
            store,
            library,
            settings,
        }
    }

    /// Library session named by the reader's `Cookie` headers
    pub fn library_session<'a, I>(&self, cookie_headers: I) -> LibrarySession
    where
        I: IntoIterator<Item = &'a str>,
    {
        LibrarySession::from_cookie_headers(cookie_headers, &self.settings.session_cookie)
    }

    /// Circulation actions performed as `session`
    pub fn actions_for(&self, session: &LibrarySession) -> Arc<dyn BookActions> {
        self.library.actions(session)
    }

    /// Recency tracker bound to one browsing session
    pub fn tracker_for(&self, session_id: &str) -> RecencyTracker {
        let store = ScopedStore::new(self.store.clone(), session_id);
        RecencyTracker::with_settings(
            Arc::new(store),
            self.settings.recent_key.clone(),
            self.settings.max_recent,
        )
    }

    /// Recommendation loader for one session rendering into `containers`
    pub fn loader_for(
        &self,
        session_id: &str,
        library_session: &LibrarySession,
        containers: Arc<dyn ContainerRegistry>,
    ) -> RecommendationLoader {
        RecommendationLoader::new(
            self.library.provider(library_session),
            self.tracker_for(session_id),
            containers,
        )
    }
}
