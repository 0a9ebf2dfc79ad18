use async_trait::async_trait;

/// Text generation backend reached with one credential per call.
///
/// Credential rotation lives above this trait; implementations make exactly
/// one request with the key they are given.
#[async_trait]
pub trait LanguageModelRepository: Send + Sync {
    /// Send `prompt` and return the first candidate's text
    ///
    /// # Errors
    /// Returns a description of the failure when the request fails, the
    /// provider rejects the key, or the reply carries no text.
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, String>;
}
