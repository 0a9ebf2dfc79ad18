use crate::domain::playback::Voice;
use async_trait::async_trait;

/// Repository for TTS synthesis of single utterances.
/// Abstracts the underlying TTS provider (AWS Polly, OpenAI)
///
/// Implementations map the two client voice identities onto provider voices
/// and apply the playback rate.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize one utterance to MP3 audio
    ///
    /// # Arguments
    /// * `text` - The utterance text, at most 1,000 characters
    /// * `voice` - The voice identity chosen by the voice schedule
    /// * `rate` - Playback speed multiplier, 0.5 to 2.0
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(&self, text: &str, voice: Voice, rate: f32) -> Result<Vec<u8>, String>;

    /// Short provider name for readiness and logs
    fn provider(&self) -> &'static str;
}
