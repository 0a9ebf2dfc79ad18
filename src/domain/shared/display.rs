use serde::{Deserialize, Serialize};

/// How much of a sentence card is revealed: 0 shows the English line only,
/// 1 adds the translation, 2 adds the grammar note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevealLevel(u8);

impl RevealLevel {
    pub const MAX: u8 = 2;

    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::MAX).then_some(Self(level))
    }

    /// Next level on click, wrapping back to hidden
    pub fn next(self) -> Self {
        Self((self.0 + 1) % (Self::MAX + 1))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Fresh reveal states for a newly delivered result set
pub fn display_states(len: usize) -> Vec<RevealLevel> {
    vec![RevealLevel::default(); len]
}
