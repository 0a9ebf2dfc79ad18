use crate::domain::playback::{SpeechEngine, SpeechError, SpeechOptions, Utterance, Voice};
use crate::domain::shared::preview;
use crate::infrastructure::repositories::TtsRepository;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use uuid::Uuid;

/// The utterance a client session should be playing right now
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedUtterance {
    pub id: Uuid,
    pub index: usize,
    pub text: String,
    pub voice: Voice,
    pub rate: f32,
    pub volume: f32,
    pub audio_url: String,
}

struct Pending {
    utterance: PublishedUtterance,
    audio: Arc<Vec<u8>>,
    ended: oneshot::Sender<()>,
}

/// Speech engine whose audio is played by the Mini App.
///
/// `speak` synthesizes through the TTS provider, publishes the result as the
/// session's current utterance and resolves when the client reports that it
/// ended. Replacing or cancelling the current utterance drops its sender,
/// which resolves the waiting `speak` as cancelled.
pub struct ClientSpeechEngine {
    tts: Arc<dyn TtsRepository>,
    current: Mutex<Option<Pending>>,
    ack_timeout: Duration,
}

impl ClientSpeechEngine {
    pub fn new(tts: Arc<dyn TtsRepository>, ack_timeout: Duration) -> Self {
        Self {
            tts,
            current: Mutex::new(None),
            ack_timeout,
        }
    }

    /// Client callback: the utterance `id` finished playing.
    ///
    /// Returns false when `id` is not the current utterance (stale or unknown).
    pub async fn ended(&self, id: Uuid) -> bool {
        let mut current = self.current.lock().await;
        match current.take() {
            Some(pending) if pending.utterance.id == id => {
                tracing::debug!(utterance_id = %id, index = pending.utterance.index, "Utterance ended");
                let _ = pending.ended.send(());
                true
            }
            other => {
                *current = other;
                false
            }
        }
    }

    pub async fn current(&self) -> Option<PublishedUtterance> {
        self.current
            .lock()
            .await
            .as_ref()
            .map(|pending| pending.utterance.clone())
    }

    /// Audio of the current utterance; earlier utterances are gone
    pub async fn audio(&self, id: Uuid) -> Option<Arc<Vec<u8>>> {
        self.current
            .lock()
            .await
            .as_ref()
            .filter(|pending| pending.utterance.id == id)
            .map(|pending| pending.audio.clone())
    }

    async fn clear_if_current(&self, id: Uuid) {
        let mut current = self.current.lock().await;
        if current.as_ref().is_some_and(|pending| pending.utterance.id == id) {
            *current = None;
        }
    }
}

#[async_trait]
impl SpeechEngine for ClientSpeechEngine {
    async fn speak(
        &self,
        utterance: &Utterance,
        options: &SpeechOptions,
    ) -> Result<(), SpeechError> {
        let audio = self
            .tts
            .synthesize(&utterance.text, options.voice, options.rate)
            .await
            .map_err(SpeechError::Unavailable)?;

        let id = Uuid::new_v4();
        let (ended, receiver) = oneshot::channel();
        let published = PublishedUtterance {
            id,
            index: utterance.index,
            text: utterance.text.clone(),
            voice: options.voice,
            rate: options.rate,
            volume: options.volume,
            audio_url: format!("/api/utterances/{}/audio", id),
        };

        tracing::debug!(
            utterance_id = %id,
            index = utterance.index,
            voice = options.voice.as_str(),
            text_preview = %preview(&utterance.text, 60),
            audio_size_bytes = audio.len(),
            "Utterance published"
        );

        *self.current.lock().await = Some(Pending {
            utterance: published,
            audio: Arc::new(audio),
            ended,
        });

        match tokio::time::timeout(self.ack_timeout, receiver).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(SpeechError::Cancelled),
            Err(_) => {
                self.clear_if_current(id).await;
                tracing::warn!(
                    utterance_id = %id,
                    timeout_secs = self.ack_timeout.as_secs(),
                    "Client never reported the end of the utterance"
                );
                Err(SpeechError::Timeout(self.ack_timeout.as_secs()))
            }
        }
    }

    async fn cancel(&self) {
        if let Some(pending) = self.current.lock().await.take() {
            tracing::debug!(utterance_id = %pending.utterance.id, "Utterance cancelled");
        }
    }
}
