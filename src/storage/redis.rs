use redis::AsyncCommands;
use redis::Client;

use super::SessionStore;
use crate::error::AppResult;

/// Creates a Redis client for session storage
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Redis-backed session store
///
/// Every write refreshes the key's TTL, so a session's recently viewed list
/// expires together with an idle session. A TTL of zero stores keys without expiry.
#[derive(Clone)]
pub struct RedisStore {
    redis_client: Client,
    ttl: u64,
}

impl RedisStore {
    pub fn new(redis_client: Client, ttl: u64) -> Self {
        Self { redis_client, ttl }
    }
}

#[async_trait::async_trait]
impl SessionStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        if self.ttl == 0 {
            let _: () = conn.set(key, value).await?;
        } else {
            let _: () = conn.set_ex(key, value, self.ttl).await?;
        }
        tracing::debug!(key = %key, ttl = self.ttl, "Session value written to Redis");
        Ok(())
    }
}
