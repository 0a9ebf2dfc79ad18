use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

/// Session-scoped key/value store holding serialized cache entries.
///
/// Keys already carry the client session id as a prefix, so one store serves
/// every session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn put(&self, key: &str, value: String);

    async fn remove(&self, key: &str);
}

/// In-process store backed by a moka cache; entries expire once idle
pub struct MokaSessionStore {
    cache: Cache<String, String>,
}

impl MokaSessionStore {
    pub fn new(time_to_idle: Duration) -> Self {
        let cache = Cache::builder().time_to_idle(time_to_idle).build();
        Self { cache }
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key).await
    }

    async fn put(&self, key: &str, value: String) {
        tracing::debug!(key = %key, value_size = value.len(), "Session store write");
        self.cache.insert(key.to_string(), value).await;
    }

    async fn remove(&self, key: &str) {
        self.cache.invalidate(key).await;
    }
}
