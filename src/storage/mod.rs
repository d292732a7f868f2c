//! Session-scoped key/value storage
//!
//! The recency tracker only needs `get` and `set` on string values, so every
//! backend (in-memory, Redis) sits behind the [`SessionStore`] trait and is
//! injected where it is used.
use std::sync::Arc;

use crate::error::AppResult;

pub mod memory;
pub mod redis;

pub use self::memory::MemoryStore;
pub use self::redis::{create_redis_client, RedisStore};

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the value stored under `key`, if any
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: String) -> AppResult<()>;
}

/// Store view that confines all keys to one browsing session
///
/// Keys are rewritten to `session:{session_id}:{key}` before reaching the
/// underlying store, so a single backend can serve every session.
#[derive(Clone)]
pub struct ScopedStore {
    inner: Arc<dyn SessionStore>,
    session_id: String,
}

impl ScopedStore {
    pub fn new(inner: Arc<dyn SessionStore>, session_id: impl Into<String>) -> Self {
        Self {
            inner,
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn scoped_key(&self, key: &str) -> String {
        format!("session:{}:{}", self.session_id, key)
    }
}

#[async_trait::async_trait]
impl SessionStore for ScopedStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(&self.scoped_key(key)).await
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        self.inner.set(&self.scoped_key(key), value).await
    }
}
