use axum::body::Bytes;
use moka::future::Cache;
use std::sync::Arc;
use uuid::Uuid;

/// Upper bound on recorded audio held for one client session
const VAULT_CAPACITY_BYTES: u64 = 32 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct StoredRecording {
    pub content_type: String,
    pub audio: Bytes,
}

/// Audio bytes of practice recordings, keyed by `RecordingRef::id`.
///
/// Dialogue cache entries only carry the reference; the oldest audio is
/// evicted first once the session holds more than the capacity.
pub struct RecordingVault {
    recordings: Cache<Uuid, Arc<StoredRecording>>,
}

impl RecordingVault {
    pub fn new() -> Self {
        let recordings = Cache::builder()
            .weigher(|_id: &Uuid, recording: &Arc<StoredRecording>| {
                u32::try_from(recording.audio.len()).unwrap_or(u32::MAX)
            })
            .max_capacity(VAULT_CAPACITY_BYTES)
            .build();
        Self { recordings }
    }

    pub async fn insert(&self, id: Uuid, recording: StoredRecording) {
        tracing::debug!(
            recording_id = %id,
            audio_size_bytes = recording.audio.len(),
            content_type = %recording.content_type,
            "Recording stored"
        );
        self.recordings.insert(id, Arc::new(recording)).await;
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<StoredRecording>> {
        self.recordings.get(&id).await
    }
}

impl Default for RecordingVault {
    fn default() -> Self {
        Self::new()
    }
}
