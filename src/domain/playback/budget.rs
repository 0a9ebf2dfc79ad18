use std::sync::atomic::{AtomicUsize, Ordering};

/// Characters of synthesized speech a client session may use.
///
/// Starting a playback is refused once the total has gone past the limit;
/// a running playback is allowed to finish the utterance that crossed it.
#[derive(Debug)]
pub struct CharacterBudget {
    limit: usize,
    spoken: AtomicUsize,
}

impl CharacterBudget {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            spoken: AtomicUsize::new(0),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn spoken(&self) -> usize {
        self.spoken.load(Ordering::SeqCst)
    }

    pub fn is_exhausted(&self) -> bool {
        self.spoken() > self.limit
    }

    /// Add `chars` and return the new total
    pub fn consume(&self, chars: usize) -> usize {
        self.spoken.fetch_add(chars, Ordering::SeqCst) + chars
    }
}
