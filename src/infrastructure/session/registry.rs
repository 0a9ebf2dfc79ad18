use super::recordings::RecordingVault;
use crate::domain::analysis::AnalyzedSentence;
use crate::domain::cache::{SessionCache, Supersede, ANALYSIS_NAMESPACE, DIALOGUE_NAMESPACE};
use crate::domain::dialogue::DialogueTurn;
use crate::domain::playback::{
    CharacterBudget, PlaybackError, PlaybackOptions, PlaybackOrchestrator, Utterance,
};
use crate::domain::practice::{PracticeDriver, PracticeError, PracticeSnapshot, Role};
use crate::infrastructure::repositories::{SessionStore, TtsRepository};
use crate::infrastructure::speech::ClientSpeechEngine;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Limits applied to every client session
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub character_budget: usize,
    pub ack_timeout: Duration,
    pub idle_timeout: Duration,
}

/// Everything one Mini App page session owns on the server
pub struct ClientState {
    pub session_id: String,
    pub analysis_cache: SessionCache<AnalyzedSentence>,
    pub dialogue_cache: SessionCache<DialogueTurn>,
    pub analysis_supersede: Supersede,
    pub dialogue_supersede: Supersede,
    pub speech: Arc<ClientSpeechEngine>,
    pub playback: PlaybackOrchestrator,
    pub practice: PracticeDriver,
    pub recordings: RecordingVault,
    practice_key: Mutex<Option<String>>,
    /// Held while switching between playback and practice
    mode_switch: Mutex<()>,
}

impl ClientState {
    fn new(
        session_id: &str,
        store: Arc<dyn SessionStore>,
        tts: Arc<dyn TtsRepository>,
        settings: &ClientSettings,
    ) -> Self {
        let speech = Arc::new(ClientSpeechEngine::new(tts, settings.ack_timeout));
        let budget = Arc::new(CharacterBudget::new(settings.character_budget));

        Self {
            session_id: session_id.to_string(),
            analysis_cache: SessionCache::new(
                store.clone(),
                session_id.to_string(),
                ANALYSIS_NAMESPACE,
            ),
            dialogue_cache: SessionCache::new(store, session_id.to_string(), DIALOGUE_NAMESPACE),
            analysis_supersede: Supersede::new(),
            dialogue_supersede: Supersede::new(),
            playback: PlaybackOrchestrator::new(speech.clone(), budget),
            practice: PracticeDriver::new(speech.clone()),
            speech,
            recordings: RecordingVault::new(),
            practice_key: Mutex::new(None),
            mode_switch: Mutex::new(()),
        }
    }

    /// Dialogue text of the latest practice run, used to find its recordings
    pub async fn practice_key(&self) -> Option<String> {
        self.practice_key.lock().await.clone()
    }

    /// Leave practice mode and start reading `utterances`
    pub async fn start_playback(
        &self,
        utterances: Vec<Utterance>,
        options: PlaybackOptions,
    ) -> Result<(), PlaybackError> {
        let _switch = self.mode_switch.lock().await;
        self.practice.stop().await;
        self.playback.play(utterances, options).await
    }

    /// Stop playback and enter practice on the dialogue cached under `dialogue_key`
    pub async fn start_practice(
        &self,
        dialogue_key: String,
        lines: Vec<String>,
        role: Role,
        speed: f32,
    ) -> Result<PracticeSnapshot, PracticeError> {
        let _switch = self.mode_switch.lock().await;
        self.playback.stop().await;
        let snapshot = self
            .practice
            .start(dialogue_key.clone(), lines, role, speed)
            .await?;
        *self.practice_key.lock().await = Some(dialogue_key);
        Ok(snapshot)
    }

    /// Stop everything the session is running
    pub async fn shutdown(&self) {
        let _switch = self.mode_switch.lock().await;
        self.playback.stop().await;
        self.practice.stop().await;
        self.analysis_supersede.cancel();
        self.dialogue_supersede.cancel();
    }
}

/// Client sessions keyed by `X-Session-Id`; a session idle for longer than
/// the configured timeout is dropped together with its running tasks
pub struct ClientRegistry {
    clients: Cache<String, Arc<ClientState>>,
    store: Arc<dyn SessionStore>,
    tts: Arc<dyn TtsRepository>,
    settings: ClientSettings,
}

impl ClientRegistry {
    pub fn new(
        store: Arc<dyn SessionStore>,
        tts: Arc<dyn TtsRepository>,
        settings: ClientSettings,
    ) -> Self {
        let clients = Cache::builder()
            .time_to_idle(settings.idle_timeout)
            .eviction_listener(|session_id: Arc<String>, state: Arc<ClientState>, cause| {
                tracing::info!(session_id = %session_id, cause = ?cause, "Client session evicted");
                if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                    runtime.spawn(async move { state.shutdown().await });
                }
            })
            .build();

        Self {
            clients,
            store,
            tts,
            settings,
        }
    }

    pub async fn get_or_create(&self, session_id: &str) -> Arc<ClientState> {
        self.clients
            .get_with(session_id.to_string(), async {
                tracing::info!(session_id = %session_id, "New client session");
                Arc::new(ClientState::new(
                    session_id,
                    self.store.clone(),
                    self.tts.clone(),
                    &self.settings,
                ))
            })
            .await
    }

    pub fn tts_provider(&self) -> &'static str {
        self.tts.provider()
    }
}
