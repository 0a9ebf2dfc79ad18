use super::AnalyzedSentence;
use crate::domain::shared::preview;

/// Separator between the parts of one sentence record
pub const PART_SEPARATOR: &str = "---";
/// Separator between sentence records in free-analysis replies
pub const SENTENCE_SEPARATOR: &str = "===";

/// Merged paragraphs stay under this many characters
pub const MERGE_THRESHOLD: usize = 150;
/// Once this many paragraphs are merged, every further line becomes its own paragraph
pub const MAX_MERGED_PARAGRAPHS: usize = 8;

pub const FORMAT_ERROR_TRANSLATION: &str = "Lỗi định dạng dịch";
pub const FORMAT_ERROR_GRAMMAR: &str = "Lỗi định dạng phân tích";
pub const UPSTREAM_ERROR_TRANSLATION: &str = "Lỗi khi dịch";
pub const UPSTREAM_ERROR_GRAMMAR: &str = "Lỗi khi phân tích";

/// A parsed record before the batch-wide index is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct SentenceRecord {
    pub english: String,
    pub vietnamese: String,
    pub grammar: String,
}

impl SentenceRecord {
    /// Placeholder for a paragraph whose request failed with every credential
    pub fn upstream_failure(paragraph: &str) -> Self {
        Self {
            english: paragraph.to_string(),
            vietnamese: UPSTREAM_ERROR_TRANSLATION.to_string(),
            grammar: UPSTREAM_ERROR_GRAMMAR.to_string(),
        }
    }

    pub fn with_index(self, index: usize) -> AnalyzedSentence {
        AnalyzedSentence {
            english: self.english,
            vietnamese: self.vietnamese,
            grammar: self.grammar,
            index,
        }
    }
}

/// Split user input into the paragraphs sent to the analysis API.
///
/// Non-empty lines are merged with a single space while the running paragraph
/// plus the next line stays under [`MERGE_THRESHOLD`] characters and fewer than
/// [`MAX_MERGED_PARAGRAPHS`] paragraphs have been emitted.
pub fn merge_paragraphs(text: &str) -> Vec<String> {
    let lines = text.split('\n').map(str::trim).filter(|l| !l.is_empty());

    let mut merged: Vec<String> = Vec::new();
    let mut pending = String::new();

    for line in lines {
        let fits = pending.chars().count() + line.chars().count() < MERGE_THRESHOLD;
        if fits && merged.len() < MAX_MERGED_PARAGRAPHS {
            if !pending.is_empty() {
                pending.push(' ');
            }
            pending.push_str(line);
        } else if !pending.is_empty() {
            merged.push(std::mem::replace(&mut pending, line.to_string()));
        } else {
            merged.push(line.to_string());
        }
    }

    if !pending.is_empty() {
        merged.push(pending);
    }

    merged
}

/// Parse a free-analysis reply into sentence records.
///
/// Groups with fewer than three parts keep their whole text as the English
/// sentence and get the format sentinels instead of failing the batch.
pub fn parse_analysis(raw: &str) -> Vec<SentenceRecord> {
    raw.split(SENTENCE_SEPARATOR)
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(|group| {
            let parts: Vec<&str> = group.split(PART_SEPARATOR).map(str::trim).collect();
            if parts.len() >= 3 {
                SentenceRecord {
                    english: parts[0].to_string(),
                    vietnamese: parts[1].to_string(),
                    grammar: parts[2..].join(PART_SEPARATOR),
                }
            } else {
                tracing::warn!(
                    parts = parts.len(),
                    group_preview = %preview(group, 120),
                    "Analysis group has fewer than 3 parts, using format sentinels"
                );
                SentenceRecord {
                    english: group.to_string(),
                    vietnamese: FORMAT_ERROR_TRANSLATION.to_string(),
                    grammar: FORMAT_ERROR_GRAMMAR.to_string(),
                }
            }
        })
        .collect()
}
