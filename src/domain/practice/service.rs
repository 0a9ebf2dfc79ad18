use super::error::PracticeError;
use super::microphone::{classify, MicrophoneProbe};
use super::session::{PracticeSession, TurnState};
use super::{PracticeSnapshot, Role};
use crate::domain::playback::{SpeechEngine, SpeechError, SpeechOptions, Utterance, VoiceSchedule};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Recording closed on a user turn, for the caller to store and attach
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedRecording {
    pub turn_index: usize,
    pub dialogue_key: String,
}

struct ActivePractice {
    session: PracticeSession,
    dialogue_key: String,
    lines: Arc<Vec<String>>,
    speed: f32,
    recorded_turns: Vec<usize>,
    last_error: Option<String>,
}

impl ActivePractice {
    fn snapshot(&self) -> PracticeSnapshot {
        PracticeSnapshot {
            active: !matches!(self.session.state(), TurnState::Finished),
            turn: self.session.state(),
            role: Some(self.session.role()),
            total_turns: self.session.total_turns(),
            recording: self.session.is_recording(),
            recorded_turns: self.recorded_turns.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Speak system turns back to back until a user turn (or the end) is reached
async fn narrate_turns(engine: Arc<dyn SpeechEngine>, active: Arc<Mutex<Option<ActivePractice>>>) {
    loop {
        let (utterance, options) = {
            let guard = active.lock().await;
            let Some(practice) = guard.as_ref() else {
                return;
            };
            let TurnState::SystemTurn(index) = practice.session.state() else {
                return;
            };
            let Some(text) = practice.lines.get(index) else {
                return;
            };
            (
                Utterance {
                    index,
                    text: text.clone(),
                },
                SpeechOptions {
                    voice: VoiceSchedule::Alternating.voice_for(index),
                    rate: practice.speed,
                    volume: 1.0,
                },
            )
        };

        let result = engine.speak(&utterance, &options).await;

        let mut guard = active.lock().await;
        let Some(practice) = guard.as_mut() else {
            return;
        };
        if practice.session.state() != TurnState::SystemTurn(utterance.index) {
            return;
        }
        match result {
            Ok(()) => {
                let next = practice.session.advance();
                tracing::debug!(index = utterance.index, next = ?next, "System turn spoken");
            }
            Err(SpeechError::Cancelled) => return,
            Err(e) => {
                tracing::error!(index = utterance.index, error = %e, "System turn failed");
                practice.last_error = Some(e.to_string());
                return;
            }
        }
    }
}

/// Runs role-play practice over a cached dialogue for one client session
pub struct PracticeDriver {
    engine: Arc<dyn SpeechEngine>,
    active: Arc<Mutex<Option<ActivePractice>>>,
    narrator: Mutex<Option<JoinHandle<()>>>,
    /// Serializes start, stop and turn changes
    transition: Mutex<()>,
}

impl PracticeDriver {
    pub fn new(engine: Arc<dyn SpeechEngine>) -> Self {
        Self {
            engine,
            active: Arc::new(Mutex::new(None)),
            narrator: Mutex::new(None),
            transition: Mutex::new(()),
        }
    }

    pub async fn snapshot(&self) -> PracticeSnapshot {
        self.active
            .lock()
            .await
            .as_ref()
            .map(ActivePractice::snapshot)
            .unwrap_or_else(PracticeSnapshot::inactive)
    }

    /// Enter practice mode at turn 0, speaking it right away when it is not the user's
    pub async fn start(
        &self,
        dialogue_key: String,
        lines: Vec<String>,
        role: Role,
        speed: f32,
    ) -> Result<PracticeSnapshot, PracticeError> {
        if lines.is_empty() {
            return Err(PracticeError::EmptyDialogue);
        }
        let _transition = self.transition.lock().await;
        self.halt().await;

        let mut session = PracticeSession::new(role, lines.len());
        let state = session.start();
        tracing::info!(role = ?role, total_turns = lines.len(), first_turn = ?state, "Practice started");

        let practice = ActivePractice {
            session,
            dialogue_key,
            lines: Arc::new(lines),
            speed,
            recorded_turns: Vec::new(),
            last_error: None,
        };
        let snapshot = practice.snapshot();
        *self.active.lock().await = Some(practice);

        self.narrate_if_needed(state).await;
        Ok(snapshot)
    }

    /// Leave practice mode, silencing any system turn in progress
    pub async fn stop(&self) {
        let _transition = self.transition.lock().await;
        self.halt().await;
    }

    async fn halt(&self) {
        self.silence().await;
        if self.active.lock().await.take().is_some() {
            tracing::info!("Practice stopped");
        }
    }

    pub async fn begin_recording(&self, probe: &MicrophoneProbe) -> Result<usize, PracticeError> {
        let mut guard = self.active.lock().await;
        let practice = guard.as_mut().ok_or(PracticeError::NotActive)?;

        if let Err(e) = classify(probe) {
            tracing::warn!(error = %e, turn = ?practice.session.state(), "Microphone unavailable");
            return Err(e.into());
        }

        let index = practice.session.begin_recording()?;
        tracing::debug!(index, "Recording started");
        Ok(index)
    }

    /// Close the recording on the current user turn and advance
    pub async fn finish_recording(&self) -> Result<FinishedRecording, PracticeError> {
        let _transition = self.transition.lock().await;
        let (finished, next) = {
            let mut guard = self.active.lock().await;
            let practice = guard.as_mut().ok_or(PracticeError::NotActive)?;
            let turn_index = practice.session.finish_recording()?;
            practice.recorded_turns.push(turn_index);
            let next = practice.session.advance()?;
            (
                FinishedRecording {
                    turn_index,
                    dialogue_key: practice.dialogue_key.clone(),
                },
                next,
            )
        };

        tracing::info!(turn_index = finished.turn_index, next = ?next, "Recording finished");
        self.narrate_if_needed(next).await;
        Ok(finished)
    }

    /// Advance without recording; a system turn being spoken is cut short
    pub async fn skip(&self) -> Result<PracticeSnapshot, PracticeError> {
        let _transition = self.transition.lock().await;
        self.silence().await;

        let (snapshot, next) = {
            let mut guard = self.active.lock().await;
            let practice = guard.as_mut().ok_or(PracticeError::NotActive)?;
            let next = practice.session.advance()?;
            (practice.snapshot(), next)
        };

        tracing::debug!(next = ?next, "Turn skipped");
        self.narrate_if_needed(next).await;
        Ok(snapshot)
    }

    async fn narrate_if_needed(&self, state: TurnState) {
        if let TurnState::SystemTurn(_) = state {
            let handle = tokio::spawn(narrate_turns(self.engine.clone(), self.active.clone()));
            if let Some(previous) = self.narrator.lock().await.replace(handle) {
                previous.abort();
            }
        }
    }

    async fn silence(&self) {
        let handle = self.narrator.lock().await.take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
        }
        self.engine.cancel().await;
    }
}
