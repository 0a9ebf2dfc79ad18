pub mod error;
pub mod parser;
pub mod service;

pub use error::DialogueError;
pub use parser::{parse_dialogue, ParseError, EXPECTED_DIALOGUE_TURNS};
pub use service::{DialogueService, DialogueServiceApi};

use crate::domain::analysis::{format_grammar, GrammarLine};
use crate::domain::cache::{CacheEntry, CacheOutcome, RecordingRef};
use crate::domain::practice::Role;
use crate::domain::shared::{display_states, RevealLevel};
use serde::{Deserialize, Serialize};

/// One line of a generated practice dialogue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueTurn {
    pub english: String,
    pub vietnamese: String,
    pub grammar: String,
}

/// Request for POST /api/dialogue
#[derive(Debug, Serialize, Deserialize)]
pub struct DialogueRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TurnView {
    pub index: usize,
    pub speaker: Role,
    pub english: String,
    pub vietnamese: String,
    pub grammar: String,
    pub grammar_lines: Vec<GrammarLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording: Option<RecordingRef>,
}

/// Response for POST /api/dialogue
#[derive(Debug, Serialize, Deserialize)]
pub struct DialogueResponse {
    pub status: String,
    pub turns: Vec<TurnView>,
    pub display_states: Vec<RevealLevel>,
}

fn turn_views(entry: &CacheEntry<DialogueTurn>) -> Vec<TurnView> {
    entry
        .sentences
        .iter()
        .enumerate()
        .map(|(index, turn)| TurnView {
            index,
            speaker: Role::for_turn(index),
            english: turn.english.clone(),
            vietnamese: turn.vietnamese.clone(),
            grammar: turn.grammar.clone(),
            grammar_lines: format_grammar(&turn.grammar),
            recording: entry.recordings.get(&index).cloned(),
        })
        .collect()
}

impl From<&CacheOutcome<DialogueTurn>> for DialogueResponse {
    fn from(outcome: &CacheOutcome<DialogueTurn>) -> Self {
        let turns = outcome.entry().map(turn_views).unwrap_or_default();
        Self {
            status: outcome.status().to_string(),
            display_states: display_states(turns.len()),
            turns,
        }
    }
}
