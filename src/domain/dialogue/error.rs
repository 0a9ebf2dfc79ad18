use super::parser::ParseError;
use crate::domain::analysis::error::SUPERSEDED_MESSAGE;
use crate::domain::generation::RotationError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum DialogueError {
    #[error("upstream error: {0}")]
    Upstream(#[from] RotationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("superseded by a newer request")]
    Superseded,
}

impl From<DialogueError> for AppError {
    fn from(err: DialogueError) -> Self {
        match err {
            DialogueError::Upstream(RotationError::Exhausted { last_error, .. }) => {
                AppError::ExternalService(format!("Lỗi khi tạo hội thoại: {}", last_error))
            }
            DialogueError::Parse(ParseError::InvalidResponse(msg)) => {
                AppError::ExternalService(format!("Lỗi khi tạo hội thoại: {}", msg))
            }
            DialogueError::Superseded => AppError::Conflict(SUPERSEDED_MESSAGE.to_string()),
        }
    }
}
