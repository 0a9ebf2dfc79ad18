#[derive(Debug, Clone, thiserror::Error)]
pub enum RotationError {
    #[error("all {attempts} API keys failed: {last_error}")]
    Exhausted { attempts: usize, last_error: String },
}
