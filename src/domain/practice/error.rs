use super::microphone::MicrophoneError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum PracticeError {
    #[error("practice mode is not active")]
    NotActive,
    #[error("the current turn is not the user's")]
    NotUserTurn,
    #[error("a recording is already in progress")]
    AlreadyRecording,
    #[error("no recording in progress")]
    NotRecording,
    #[error("dialogue has no turns")]
    EmptyDialogue,
    #[error("no dialogue cached for this text")]
    NotCached,
    #[error("recording is empty")]
    EmptyRecording,
    #[error(transparent)]
    Microphone(#[from] MicrophoneError),
}

impl From<PracticeError> for AppError {
    fn from(err: PracticeError) -> Self {
        match err {
            PracticeError::NotActive => {
                AppError::Conflict("Chưa bắt đầu luyện giao tiếp".to_string())
            }
            PracticeError::NotUserTurn => AppError::Conflict("Chưa đến lượt của bạn".to_string()),
            PracticeError::AlreadyRecording => {
                AppError::Conflict("Đang ghi âm".to_string())
            }
            PracticeError::NotRecording => AppError::Conflict("Chưa bắt đầu ghi âm".to_string()),
            PracticeError::EmptyDialogue => {
                AppError::BadRequest("Không có hội thoại để phát".to_string())
            }
            PracticeError::NotCached => {
                AppError::NotFound("Chưa có hội thoại cho đoạn văn này".to_string())
            }
            PracticeError::EmptyRecording => {
                AppError::BadRequest("Bản ghi âm trống".to_string())
            }
            PracticeError::Microphone(e) => AppError::Unprocessable(e.to_string()),
        }
    }
}
