use super::{SpeechOptions, Utterance};
use crate::error::AppError;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpeechError {
    #[error("speech cancelled")]
    Cancelled,
    #[error("no end-of-utterance report within {0} seconds")]
    Timeout(u64),
    #[error("speech engine unavailable: {0}")]
    Unavailable(String),
}

impl From<SpeechError> for AppError {
    fn from(err: SpeechError) -> Self {
        match err {
            SpeechError::Cancelled => AppError::Conflict("Đã dừng phát âm".to_string()),
            SpeechError::Timeout(_) => AppError::ExternalService(err.to_string()),
            SpeechError::Unavailable(msg) => {
                AppError::ExternalService(format!("Không thể phát âm: {}", msg))
            }
        }
    }
}

/// Speech synthesis collaborator driven one utterance at a time
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Speak one utterance, resolving once it has finished playing
    async fn speak(&self, utterance: &Utterance, options: &SpeechOptions)
        -> Result<(), SpeechError>;

    /// Cancel the current and any queued utterance
    async fn cancel(&self);
}
