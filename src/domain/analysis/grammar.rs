use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Line break marker the analysis prompt asks the model to emit after each highlighted phrase
pub const LINE_MARKER: &str = "||";

static QUOTED_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:\*\*|\*)?["']([^"']+)["'](?:\*\*|\*)?"#).expect("valid phrase pattern")
});

/// One displayable line of a grammar note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarLine {
    pub parts: Vec<GrammarPart>,
}

/// A sentence of a grammar line, with its quoted phrase pulled out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phrase: Option<String>,
    pub explanation: String,
    pub bold: bool,
}

/// Split a grammar note into lines on `||`, then into sentences on `.`.
///
/// The first quoted phrase of each sentence is extracted (with any `*`/`**`
/// markup stripped); only the first sentence of a line is rendered bold.
pub fn format_grammar(grammar: &str) -> Vec<GrammarLine> {
    grammar
        .split(LINE_MARKER)
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| {
            let parts = segment
                .split('.')
                .filter(|sentence| !sentence.trim().is_empty())
                .enumerate()
                .map(|(position, sentence)| match QUOTED_PHRASE.captures(sentence) {
                    Some(caps) => {
                        let whole = caps.get(0).map_or("", |m| m.as_str());
                        let phrase = caps.get(1).map_or("", |m| m.as_str());
                        GrammarPart {
                            phrase: Some(phrase.to_string()),
                            explanation: sentence.replacen(whole, "", 1).trim().to_string(),
                            bold: position == 0,
                        }
                    }
                    None => GrammarPart {
                        phrase: None,
                        explanation: sentence.trim().to_string(),
                        bold: false,
                    },
                })
                .collect();
            GrammarLine { parts }
        })
        .collect()
}
