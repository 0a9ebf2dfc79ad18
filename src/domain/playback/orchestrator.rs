use super::budget::CharacterBudget;
use super::engine::{SpeechEngine, SpeechError};
use super::error::PlaybackError;
use super::{
    PlaybackOptions, PlaybackSnapshot, PlaybackState, SpeechOptions, Utterance,
    MAX_UTTERANCE_CHARS, REPEAT_PAUSE_SECS,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// Resolves once `cancel` is raised or its sender is gone
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let _ = cancel.wait_for(|raised| *raised).await;
}

struct PlaybackRun {
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Drives a speech engine through an ordered utterance sequence, one at a time.
pub struct PlaybackOrchestrator {
    engine: Arc<dyn SpeechEngine>,
    budget: Arc<CharacterBudget>,
    snapshot: Arc<watch::Sender<PlaybackSnapshot>>,
    run: Mutex<Option<PlaybackRun>>,
    repeat_pause: Duration,
}

impl PlaybackOrchestrator {
    pub fn new(engine: Arc<dyn SpeechEngine>, budget: Arc<CharacterBudget>) -> Self {
        let (snapshot, _) = watch::channel(PlaybackSnapshot::idle(budget.limit()));
        Self {
            engine,
            budget,
            snapshot: Arc::new(snapshot),
            run: Mutex::new(None),
            repeat_pause: Duration::from_secs(REPEAT_PAUSE_SECS),
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshot.subscribe()
    }

    /// Start playing `utterances`, replacing any playback already running
    pub async fn play(
        &self,
        utterances: Vec<Utterance>,
        options: PlaybackOptions,
    ) -> Result<(), PlaybackError> {
        if utterances.is_empty() {
            return Err(PlaybackError::NothingToPlay);
        }

        // Held until the new run is stored so concurrent calls start one run at a time
        let mut run = self.run.lock().await;
        self.halt(&mut run).await;

        if self.budget.is_exhausted() {
            tracing::warn!(
                characters_spoken = self.budget.spoken(),
                limit = self.budget.limit(),
                "Character budget exceeded, refusing playback"
            );
            return Err(PlaybackError::CharacterBudget);
        }

        tracing::info!(
            utterance_count = utterances.len(),
            speed = options.speed,
            repeat = options.repeat,
            "Starting playback"
        );

        self.snapshot.send_replace(PlaybackSnapshot {
            state: PlaybackState::Starting,
            repeat: options.repeat,
            repeat_count: 0,
            total_utterances: utterances.len(),
            characters_spoken: self.budget.spoken(),
            character_limit: self.budget.limit(),
            last_error: None,
        });

        let (cancel, cancel_rx) = watch::channel(false);
        let task = PlaybackTask {
            engine: self.engine.clone(),
            budget: self.budget.clone(),
            snapshot: self.snapshot.clone(),
            cancel: cancel_rx,
            utterances,
            options,
            repeat_pause: self.repeat_pause,
        };
        let handle = tokio::spawn(task.run());
        *run = Some(PlaybackRun { cancel, handle });

        Ok(())
    }

    /// Cancel the engine and the running sequence, dropping any pending repeat
    pub async fn stop(&self) {
        let mut run = self.run.lock().await;
        self.halt(&mut run).await;
    }

    async fn halt(&self, run: &mut Option<PlaybackRun>) {
        if let Some(run) = run.take() {
            let _ = run.cancel.send(true);
            if let Err(e) = run.handle.await {
                tracing::warn!(error = %e, "Playback task ended abnormally");
            }
        }
        // Clears an utterance left behind by the run that was just dropped
        self.engine.cancel().await;

        self.snapshot.send_if_modified(|s| {
            let changed = s.is_active() || s.repeat_count != 0;
            s.state = PlaybackState::Idle;
            s.repeat_count = 0;
            changed
        });
    }
}

/// A single playback run, owned by its spawned task
struct PlaybackTask {
    engine: Arc<dyn SpeechEngine>,
    budget: Arc<CharacterBudget>,
    snapshot: Arc<watch::Sender<PlaybackSnapshot>>,
    cancel: watch::Receiver<bool>,
    utterances: Vec<Utterance>,
    options: PlaybackOptions,
    repeat_pause: Duration,
}

impl PlaybackTask {
    async fn run(mut self) {
        loop {
            for utterance in &self.utterances {
                if *self.cancel.borrow() {
                    return;
                }

                let length = utterance.text.chars().count();
                if length > MAX_UTTERANCE_CHARS {
                    tracing::warn!(
                        index = utterance.index,
                        length,
                        "Utterance too long, skipping"
                    );
                    continue;
                }

                let spoken = self.budget.consume(length);
                self.snapshot.send_modify(|s| {
                    s.state = PlaybackState::Speaking {
                        index: utterance.index,
                    };
                    s.characters_spoken = spoken;
                });

                let options = SpeechOptions {
                    voice: self.options.voices.voice_for(utterance.index),
                    rate: self.options.speed,
                    volume: 1.0,
                };
                tracing::debug!(
                    index = utterance.index,
                    voice = options.voice.as_str(),
                    "Speaking utterance"
                );

                let result = tokio::select! {
                    result = self.engine.speak(utterance, &options) => result,
                    _ = cancelled(&mut self.cancel) => Err(SpeechError::Cancelled),
                };

                match result {
                    Ok(()) => {}
                    Err(SpeechError::Cancelled) => {
                        tracing::debug!(index = utterance.index, "Playback cancelled");
                        self.finish(None);
                        return;
                    }
                    Err(e) => {
                        tracing::error!(index = utterance.index, error = %e, "Playback aborted");
                        self.finish(Some(e.to_string()));
                        return;
                    }
                }
            }

            if !self.options.repeat {
                tracing::info!("Playback finished");
                self.finish(None);
                return;
            }

            self.snapshot.send_modify(|s| {
                s.repeat_count += 1;
                s.state = PlaybackState::Pausing;
            });
            tracing::debug!(
                pause_secs = self.repeat_pause.as_secs(),
                "Cycle complete, pausing before repeat"
            );

            let interrupted = tokio::select! {
                _ = tokio::time::sleep(self.repeat_pause) => false,
                _ = cancelled(&mut self.cancel) => true,
            };
            if interrupted {
                self.finish(None);
                return;
            }
        }
    }

    fn finish(&self, error: Option<String>) {
        self.snapshot.send_modify(|s| {
            s.state = PlaybackState::Idle;
            s.repeat_count = 0;
            if error.is_some() {
                s.last_error = error;
            }
        });
    }
}
