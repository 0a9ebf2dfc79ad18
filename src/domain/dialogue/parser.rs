use super::DialogueTurn;
use crate::domain::analysis::parser::PART_SEPARATOR;
use crate::domain::shared::preview;

/// Number of turns the dialogue prompt asks for
pub const EXPECTED_DIALOGUE_TURNS: usize = 20;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("{0}")]
    InvalidResponse(String),
}

/// Split a reply into blocks separated by blank lines.
///
/// Lines holding only whitespace count as blank and `\r\n` endings are accepted.
fn blocks(raw: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in raw.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

/// Strict dialogue parser: every block must hold exactly three non-empty parts.
///
/// Invalid blocks are dropped with a warning. Fails only when nothing valid remains.
pub fn parse_dialogue(raw: &str) -> Result<Vec<DialogueTurn>, ParseError> {
    let blocks = blocks(raw);
    if blocks.is_empty() {
        return Err(ParseError::InvalidResponse(
            "Phản hồi từ API Gemini không hợp lệ".to_string(),
        ));
    }

    let turns: Vec<DialogueTurn> = blocks
        .iter()
        .enumerate()
        .filter_map(|(block_index, block)| {
            let parts: Vec<&str> = block.split(PART_SEPARATOR).map(str::trim).collect();
            match parts.as_slice() {
                [english, vietnamese, grammar]
                    if !english.is_empty() && !vietnamese.is_empty() && !grammar.is_empty() =>
                {
                    Some(DialogueTurn {
                        english: english.to_string(),
                        vietnamese: vietnamese.to_string(),
                        grammar: grammar.to_string(),
                    })
                }
                _ => {
                    tracing::warn!(
                        block_index,
                        parts = parts.len(),
                        block_preview = %preview(block, 120),
                        "Invalid dialogue block dropped"
                    );
                    None
                }
            }
        })
        .collect();

    if turns.len() < blocks.len() {
        tracing::warn!(
            invalid_blocks = blocks.len() - turns.len(),
            "Dialogue reply had invalid blocks"
        );
    }
    if turns.is_empty() {
        return Err(ParseError::InvalidResponse(
            "Không có khối hội thoại hợp lệ".to_string(),
        ));
    }
    if turns.len() != EXPECTED_DIALOGUE_TURNS {
        tracing::warn!(
            expected = EXPECTED_DIALOGUE_TURNS,
            actual = turns.len(),
            "Unexpected dialogue length"
        );
    }

    Ok(turns)
}
