pub mod error;
pub mod grammar;
pub mod parser;
pub mod service;

pub use error::AnalysisError;
pub use grammar::{format_grammar, GrammarLine};
pub use service::{AnalysisService, AnalysisServiceApi};

use crate::domain::cache::CacheOutcome;
use crate::domain::shared::{display_states, RevealLevel};
use serde::{Deserialize, Serialize};

/// One sentence of a free analysis, indexed across the whole batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedSentence {
    pub english: String,
    pub vietnamese: String,
    pub grammar: String,
    pub index: usize,
}

/// Request for POST /api/analysis
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SentenceView {
    pub index: usize,
    pub english: String,
    pub vietnamese: String,
    pub grammar: String,
    pub grammar_lines: Vec<GrammarLine>,
}

impl From<&AnalyzedSentence> for SentenceView {
    fn from(sentence: &AnalyzedSentence) -> Self {
        Self {
            index: sentence.index,
            english: sentence.english.clone(),
            vietnamese: sentence.vietnamese.clone(),
            grammar: sentence.grammar.clone(),
            grammar_lines: format_grammar(&sentence.grammar),
        }
    }
}

/// Response for POST /api/analysis
#[derive(Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub status: String,
    pub sentences: Vec<SentenceView>,
    pub display_states: Vec<RevealLevel>,
}

impl From<&CacheOutcome<AnalyzedSentence>> for AnalysisResponse {
    fn from(outcome: &CacheOutcome<AnalyzedSentence>) -> Self {
        let sentences: Vec<SentenceView> = outcome
            .entry()
            .map(|entry| entry.sentences.iter().map(SentenceView::from).collect())
            .unwrap_or_default();
        Self {
            status: outcome.status().to_string(),
            display_states: display_states(sentences.len()),
            sentences,
        }
    }
}
