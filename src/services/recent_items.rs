use std::sync::Arc;

use crate::storage::SessionStore;

/// Store key holding a session's recently viewed ISBNs
pub const RECENT_BOOKS_KEY: &str = "library_recent_books";
/// Maximum number of identifiers kept in the recently viewed list
pub const MAX_RECENT: usize = 10;

/// Tracks the books a session viewed, issued or reserved most recently
///
/// The list is most-recent-first, never holds duplicates and is capped at
/// `capacity`. It is persisted as a JSON array of strings. Storage failures
/// never reach the caller: reads degrade to an empty list and failed writes
/// leave the previous list in place.
#[derive(Clone)]
pub struct RecencyTracker {
    store: Arc<dyn SessionStore>,
    key: String,
    capacity: usize,
}

impl RecencyTracker {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self::with_settings(store, RECENT_BOOKS_KEY, MAX_RECENT)
    }

    pub fn with_settings(
        store: Arc<dyn SessionStore>,
        key: impl Into<String>,
        capacity: usize,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Moves `isbns` to the front of the recently viewed list, in order
    ///
    /// An empty input leaves the stored list untouched.
    pub async fn record_viewed<S: AsRef<str>>(&self, isbns: &[S]) {
        if isbns.is_empty() {
            return;
        }

        let mut recent = match self.store.get(&self.key).await {
            Ok(raw) => parse_list(raw.as_deref()),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "Failed to read recent items, skipping update");
                return;
            }
        };

        push_recent(&mut recent, isbns, self.capacity);

        let json = match serde_json::to_string(&recent) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Recent items serialization error");
                return;
            }
        };

        if let Err(e) = self.store.set(&self.key, json).await {
            tracing::warn!(error = %e, key = %self.key, "Failed to persist recent items");
            return;
        }

        tracing::debug!(recorded = isbns.len(), size = recent.len(), "Recent items updated");
    }

    /// Returns the stored list, or an empty list when it is missing or unreadable
    pub async fn get_recent_items(&self) -> Vec<String> {
        match self.store.get(&self.key).await {
            Ok(raw) => parse_list(raw.as_deref()),
            Err(e) => {
                tracing::warn!(error = %e, key = %self.key, "Failed to read recent items");
                Vec::new()
            }
        }
    }
}

/// Inserts each identifier at the front (dropping its older occurrence) and
/// truncates to `capacity` once all of them are in.
pub fn push_recent<S: AsRef<str>>(recent: &mut Vec<String>, isbns: &[S], capacity: usize) {
    for isbn in isbns {
        let isbn = isbn.as_ref();
        recent.retain(|existing| existing != isbn);
        recent.insert(0, isbn.to_string());
    }
    recent.truncate(capacity);
}

fn parse_list(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Stored recent items are corrupted, treating as empty");
        Vec::new()
    })
}
