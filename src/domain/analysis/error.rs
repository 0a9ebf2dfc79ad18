use crate::error::AppError;

pub const SUPERSEDED_MESSAGE: &str = "Yêu cầu đã bị thay thế bởi yêu cầu mới hơn";

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("no valid analysis results")]
    NoResults,
    #[error("superseded by a newer request")]
    Superseded,
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Invalid(msg) => AppError::BadRequest(msg),
            AnalysisError::NoResults => {
                AppError::ExternalService("Không có kết quả phân tích hợp lệ".to_string())
            }
            AnalysisError::Superseded => AppError::Conflict(SUPERSEDED_MESSAGE.to_string()),
        }
    }
}
