use super::error::DialogueError;
use super::parser::parse_dialogue;
use super::DialogueTurn;
use crate::domain::cache::{CacheOutcome, SessionCache, Supersede};
use crate::domain::generation::{prompts, RotatingGenerator};
use async_trait::async_trait;
use std::sync::Arc;

pub struct DialogueService {
    generator: Arc<RotatingGenerator>,
}

impl DialogueService {
    pub fn new(generator: Arc<RotatingGenerator>) -> Self {
        Self { generator }
    }

    async fn fetch(&self, text: &str) -> Result<Vec<DialogueTurn>, DialogueError> {
        let raw = self.generator.generate(&prompts::dialogue_prompt(text)).await?;
        Ok(parse_dialogue(&raw)?)
    }
}

#[async_trait]
pub trait DialogueServiceApi: Send + Sync {
    /// Generate (or recall) the practice dialogue for `text`
    ///
    /// The whole dialogue is one unit of work: exhausting the key pool or
    /// receiving no valid block fails the request instead of producing a
    /// placeholder.
    async fn generate(
        &self,
        cache: &SessionCache<DialogueTurn>,
        supersede: &Supersede,
        text: &str,
    ) -> Result<CacheOutcome<DialogueTurn>, DialogueError>;
}

#[async_trait]
impl DialogueServiceApi for DialogueService {
    async fn generate(
        &self,
        cache: &SessionCache<DialogueTurn>,
        supersede: &Supersede,
        text: &str,
    ) -> Result<CacheOutcome<DialogueTurn>, DialogueError> {
        if text.trim().is_empty() {
            supersede.cancel();
            cache.invalidate_previous().await;
            tracing::info!("Empty dialogue input, view cleared");
            return Ok(CacheOutcome::Cleared);
        }

        if let Some(entry) = cache.lookup(text).await {
            tracing::info!(turn_count = entry.sentences.len(), "Dialogue served from cache");
            return Ok(CacheOutcome::Cached(entry));
        }

        tracing::info!(text_length = text.len(), "Dialogue request");

        let mut flight = supersede.begin();
        let turns = flight
            .run(self.fetch(text))
            .await
            .ok_or(DialogueError::Superseded)??;

        if !flight.is_current() {
            return Err(DialogueError::Superseded);
        }

        let entry = cache.store(text, turns).await;
        tracing::info!(turn_count = entry.sentences.len(), "Dialogue stored");
        Ok(CacheOutcome::Fresh(entry))
    }
}
