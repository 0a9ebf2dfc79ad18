pub mod session_cache;
pub mod supersede;

pub use session_cache::SessionCache;
pub use supersede::{InFlight, Supersede};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

pub const ANALYSIS_NAMESPACE: &str = "analysis";
pub const DIALOGUE_NAMESPACE: &str = "dialogue";

/// Metadata of a practice recording attached to a dialogue turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingRef {
    pub id: Uuid,
    pub turn_index: usize,
    pub content_type: String,
    pub byte_len: usize,
    pub captured_at: DateTime<Utc>,
}

/// A cached result set keyed by the raw input text.
///
/// `sentences` is shared and never mutated after the entry is stored;
/// `recordings` is the side table practice mode extends.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub key: String,
    pub sentences: Arc<Vec<T>>,
    pub recordings: BTreeMap<usize, RecordingRef>,
}

/// How a fetch request was answered
#[derive(Debug, Clone)]
pub enum CacheOutcome<T> {
    /// Empty input: the previous entry was invalidated and nothing is shown
    Cleared,
    Cached(CacheEntry<T>),
    Fresh(CacheEntry<T>),
}

impl<T> CacheOutcome<T> {
    pub fn status(&self) -> &'static str {
        match self {
            CacheOutcome::Cleared => "cleared",
            CacheOutcome::Cached(_) => "cached",
            CacheOutcome::Fresh(_) => "fresh",
        }
    }

    pub fn entry(&self) -> Option<&CacheEntry<T>> {
        match self {
            CacheOutcome::Cleared => None,
            CacheOutcome::Cached(entry) | CacheOutcome::Fresh(entry) => Some(entry),
        }
    }
}
