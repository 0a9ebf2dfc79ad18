pub mod display;

pub use display::{display_states, RevealLevel};

/// First `max_chars` characters of `text`, for log fields
pub(crate) fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
