use super::error::AnalysisError;
use super::parser::{merge_paragraphs, parse_analysis, SentenceRecord};
use super::AnalyzedSentence;
use crate::domain::cache::{CacheOutcome, SessionCache, Supersede};
use crate::domain::generation::{prompts, RotatingGenerator};
use async_trait::async_trait;
use std::sync::Arc;

pub struct AnalysisService {
    generator: Arc<RotatingGenerator>,
}

impl AnalysisService {
    pub fn new(generator: Arc<RotatingGenerator>) -> Self {
        Self { generator }
    }

    /// One request per merged paragraph; a paragraph that exhausts every key
    /// becomes a placeholder record and the batch continues.
    async fn analyze_paragraphs(&self, paragraphs: &[String]) -> Vec<SentenceRecord> {
        let mut records = Vec::new();

        for (paragraph_index, paragraph) in paragraphs.iter().enumerate() {
            match self
                .generator
                .generate(&prompts::analysis_prompt(paragraph))
                .await
            {
                Ok(raw) => {
                    let parsed = parse_analysis(&raw);
                    tracing::debug!(
                        paragraph_index,
                        sentence_count = parsed.len(),
                        "Paragraph analyzed"
                    );
                    records.extend(parsed);
                }
                Err(e) => {
                    tracing::error!(
                        paragraph_index,
                        error = %e,
                        "Paragraph analysis failed with every key, using placeholder"
                    );
                    records.push(SentenceRecord::upstream_failure(paragraph));
                }
            }
        }

        records
    }
}

#[async_trait]
pub trait AnalysisServiceApi: Send + Sync {
    /// Analyze `text` for one client session
    ///
    /// This operation:
    /// - Clears the view and invalidates the previous entry on empty input
    /// - Answers from the session cache when the text was analyzed before
    /// - Otherwise fetches every paragraph, indexes the sentences across the
    ///   batch and stores the result, unless a newer request superseded it
    async fn analyze(
        &self,
        cache: &SessionCache<AnalyzedSentence>,
        supersede: &Supersede,
        text: &str,
    ) -> Result<CacheOutcome<AnalyzedSentence>, AnalysisError>;
}

#[async_trait]
impl AnalysisServiceApi for AnalysisService {
    async fn analyze(
        &self,
        cache: &SessionCache<AnalyzedSentence>,
        supersede: &Supersede,
        text: &str,
    ) -> Result<CacheOutcome<AnalyzedSentence>, AnalysisError> {
        if text.trim().is_empty() {
            supersede.cancel();
            cache.invalidate_previous().await;
            tracing::info!("Empty analysis input, view cleared");
            return Ok(CacheOutcome::Cleared);
        }

        if let Some(entry) = cache.lookup(text).await {
            tracing::info!(
                sentence_count = entry.sentences.len(),
                "Analysis served from cache"
            );
            return Ok(CacheOutcome::Cached(entry));
        }

        let paragraphs = merge_paragraphs(text);
        if paragraphs.is_empty() {
            return Err(AnalysisError::Invalid(
                "Không tìm thấy đoạn văn hợp lệ".to_string(),
            ));
        }

        tracing::info!(
            paragraph_count = paragraphs.len(),
            text_length = text.len(),
            "Analysis request"
        );

        let mut flight = supersede.begin();
        let records = flight
            .run(self.analyze_paragraphs(&paragraphs))
            .await
            .ok_or(AnalysisError::Superseded)?;

        if records.is_empty() {
            return Err(AnalysisError::NoResults);
        }
        if !flight.is_current() {
            return Err(AnalysisError::Superseded);
        }

        let sentences: Vec<AnalyzedSentence> = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.with_index(index))
            .collect();

        let entry = cache.store(text, sentences).await;
        tracing::info!(
            sentence_count = entry.sentences.len(),
            "Analysis stored"
        );
        Ok(CacheOutcome::Fresh(entry))
    }
}
