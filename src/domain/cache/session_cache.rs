use super::{CacheEntry, RecordingRef};
use crate::infrastructure::repositories::SessionStore;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Serialized form written to the session store
#[derive(Serialize, Deserialize)]
struct StoredEntry<T> {
    sentences: Vec<T>,
    #[serde(default)]
    recordings: BTreeMap<usize, RecordingRef>,
}

/// Two-level cache of parsed results for one client session and namespace.
///
/// Lookups consult the session store first, then the in-memory holder of the
/// most recent entry. Stores write to both.
pub struct SessionCache<T> {
    store: Arc<dyn SessionStore>,
    session_id: String,
    namespace: &'static str,
    holder: Mutex<Option<CacheEntry<T>>>,
    previous_key: Mutex<Option<String>>,
}

impl<T> SessionCache<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(store: Arc<dyn SessionStore>, session_id: String, namespace: &'static str) -> Self {
        Self {
            store,
            session_id,
            namespace,
            holder: Mutex::new(None),
            previous_key: Mutex::new(None),
        }
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}:{}_{}", self.session_id, self.namespace, key)
    }

    pub async fn lookup(&self, key: &str) -> Option<CacheEntry<T>> {
        if let Some(raw) = self.store.get(&self.storage_key(key)).await {
            match serde_json::from_str::<StoredEntry<T>>(&raw) {
                Ok(stored) => {
                    let entry = CacheEntry {
                        key: key.to_string(),
                        sentences: Arc::new(stored.sentences),
                        recordings: stored.recordings,
                    };
                    *self.holder.lock().await = Some(entry.clone());
                    self.remember(key).await;
                    tracing::debug!(
                        namespace = self.namespace,
                        sentence_count = entry.sentences.len(),
                        "Session store hit"
                    );
                    return Some(entry);
                }
                Err(e) => {
                    tracing::warn!(
                        namespace = self.namespace,
                        error = %e,
                        "Discarding unreadable session store entry"
                    );
                }
            }
        }

        let hit = self
            .holder
            .lock()
            .await
            .as_ref()
            .filter(|entry| entry.key == key)
            .cloned();
        if hit.is_some() {
            self.remember(key).await;
            tracing::debug!(namespace = self.namespace, "In-memory cache hit");
        }
        hit
    }

    pub async fn store(&self, key: &str, sentences: Vec<T>) -> CacheEntry<T> {
        let entry = CacheEntry {
            key: key.to_string(),
            sentences: Arc::new(sentences),
            recordings: BTreeMap::new(),
        };
        self.persist(&entry).await;
        *self.holder.lock().await = Some(entry.clone());
        self.remember(key).await;
        entry
    }

    pub async fn invalidate(&self, key: &str) {
        self.store.remove(&self.storage_key(key)).await;
        let mut holder = self.holder.lock().await;
        if holder.as_ref().is_some_and(|entry| entry.key == key) {
            *holder = None;
        }
    }

    /// Drop the entry of the last key this cache answered for and clear the holder
    pub async fn invalidate_previous(&self) {
        let previous = self.previous_key.lock().await.take();
        if let Some(key) = previous {
            tracing::debug!(namespace = self.namespace, "Invalidating previous entry");
            self.invalidate(&key).await;
        }
        *self.holder.lock().await = None;
    }

    /// Record a recording against an existing entry; the sentences stay untouched.
    ///
    /// Returns `None` when no entry exists for `key`.
    pub async fn attach_recording(
        &self,
        key: &str,
        recording: RecordingRef,
    ) -> Option<CacheEntry<T>> {
        let mut entry = self.lookup(key).await?;
        entry.recordings.insert(recording.turn_index, recording);
        self.persist(&entry).await;
        *self.holder.lock().await = Some(entry.clone());
        Some(entry)
    }

    async fn persist(&self, entry: &CacheEntry<T>) {
        let stored = StoredEntry {
            sentences: entry.sentences.as_ref().clone(),
            recordings: entry.recordings.clone(),
        };
        match serde_json::to_string(&stored) {
            Ok(raw) => self.store.put(&self.storage_key(&entry.key), raw).await,
            Err(e) => tracing::error!(
                namespace = self.namespace,
                error = %e,
                "Failed to serialize cache entry, keeping it in memory only"
            ),
        }
    }

    async fn remember(&self, key: &str) {
        *self.previous_key.lock().await = Some(key.to_string());
    }
}
