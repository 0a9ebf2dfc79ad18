use super::error::RotationError;
use crate::infrastructure::repositories::LanguageModelRepository;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Ordered credential pool with a rotation pointer shared by the whole process.
///
/// The pointer is never reset between logical requests: a key that failed
/// stays skipped until the rotation wraps back around to it.
pub struct KeyRotator {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

impl KeyRotator {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Index of the key the next attempt will use
    pub fn current_index(&self) -> usize {
        match self.keys.len() {
            0 => 0,
            n => self.cursor.load(Ordering::SeqCst) % n,
        }
    }

    /// Run `attempt` with the key at the pointer, advancing and retrying on
    /// failure, at most once per key.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, RotationError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, String>>,
    {
        let attempts = self.keys.len();
        let mut last_error = String::from("no API keys configured");

        for attempt_number in 1..=attempts {
            let index = self.current_index();
            match attempt(self.keys[index].clone()).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt_number,
                        key_index = index,
                        error = %e,
                        "API key attempt failed, rotating"
                    );
                    // Another request may already have moved past this key
                    let _ = self.cursor.compare_exchange(
                        index,
                        (index + 1) % attempts,
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    );
                    last_error = e;
                }
            }
        }

        tracing::error!(attempts, error = %last_error, "All API keys failed");
        Err(RotationError::Exhausted {
            attempts,
            last_error,
        })
    }
}

/// Text generation over the rotating credential pool
pub struct RotatingGenerator {
    rotator: Arc<KeyRotator>,
    model: Arc<dyn LanguageModelRepository>,
}

impl RotatingGenerator {
    pub fn new(rotator: Arc<KeyRotator>, model: Arc<dyn LanguageModelRepository>) -> Self {
        Self { rotator, model }
    }

    pub fn key_count(&self) -> usize {
        self.rotator.len()
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, RotationError> {
        self.rotator
            .run(|key| {
                let model = self.model.clone();
                async move { model.generate(prompt, &key).await }
            })
            .await
    }
}
