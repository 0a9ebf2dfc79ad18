use super::engine::SpeechError;
use crate::error::AppError;

pub const NOTHING_TO_PLAY_MESSAGE: &str = "Không có câu để phát";
pub const CHARACTER_BUDGET_MESSAGE: &str =
    "Đã vượt giới hạn ký tự phát âm. Vui lòng thử lại sau vài phút.";

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("nothing to play")]
    NothingToPlay,
    #[error("character budget exceeded")]
    CharacterBudget,
    #[error("invalid speed: {0}")]
    InvalidSpeed(f32),
    #[error("no cached result for this text")]
    NotCached,
    #[error(transparent)]
    Speech(#[from] SpeechError),
}

impl From<PlaybackError> for AppError {
    fn from(err: PlaybackError) -> Self {
        match err {
            PlaybackError::NothingToPlay => AppError::BadRequest(NOTHING_TO_PLAY_MESSAGE.to_string()),
            PlaybackError::CharacterBudget => {
                AppError::RateLimitExceeded(CHARACTER_BUDGET_MESSAGE.to_string())
            }
            PlaybackError::InvalidSpeed(speed) => AppError::BadRequest(format!(
                "Tốc độ phát không hợp lệ: {} (cho phép 0.5 đến 2)",
                speed
            )),
            PlaybackError::NotCached => {
                AppError::NotFound("Chưa có dữ liệu cho đoạn văn này".to_string())
            }
            PlaybackError::Speech(e) => AppError::from(e),
        }
    }
}
