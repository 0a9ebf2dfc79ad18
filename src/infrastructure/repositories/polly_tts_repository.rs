use super::tts_repository::TtsRepository;
use crate::domain::playback::Voice;
use crate::domain::shared::preview;
use async_trait::async_trait;
use aws_sdk_polly::{
    types::{Engine, OutputFormat, TextType, VoiceId},
    Client as PollyClient,
};
use std::sync::Arc;

/// AWS Polly implementation of TTS repository
pub struct PollyTtsRepository {
    polly_client: Arc<PollyClient>,
}

impl PollyTtsRepository {
    pub fn new(polly_client: Arc<PollyClient>) -> Self {
        Self { polly_client }
    }

    fn voice_id(voice: Voice) -> VoiceId {
        match voice {
            Voice::UkEnglishFemale => VoiceId::Amy,
            Voice::UsEnglishMale => VoiceId::Matthew,
        }
    }
}

/// Wrap the utterance in SSML so the rate survives synthesis
fn ssml(text: &str, rate: f32) -> String {
    let percent = (rate * 100.0).round() as u32;
    format!(
        "<speak><prosody rate=\"{}%\">{}</prosody></speak>",
        percent,
        escape_xml(text)
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[async_trait]
impl TtsRepository for PollyTtsRepository {
    async fn synthesize(&self, text: &str, voice: Voice, rate: f32) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let voice_id = Self::voice_id(voice);

        tracing::debug!(
            voice = voice.as_str(),
            voice_id = ?voice_id,
            rate,
            text_length = text.len(),
            text_preview = %preview(text, 80),
            "Calling AWS Polly synthesize_speech"
        );

        let result = self
            .polly_client
            .synthesize_speech()
            .text(ssml(text, rate))
            .text_type(TextType::Ssml)
            .voice_id(voice_id)
            .output_format(OutputFormat::Mp3)
            .engine(Engine::Neural)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    voice = voice.as_str(),
                    text_length = text.len(),
                    "AWS Polly synthesize_speech failed"
                );
                format!("AWS Polly error: {}", e)
            })?;

        let audio_stream = result.audio_stream.collect().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to collect audio stream from Polly response");
            format!("Failed to read audio stream: {}", e)
        })?;
        let audio_bytes = audio_stream.into_bytes().to_vec();

        tracing::info!(
            provider = "polly",
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.chars().count(),
            audio_size_bytes = audio_bytes.len(),
            "TTS synthesis completed"
        );

        Ok(audio_bytes)
    }

    fn provider(&self) -> &'static str {
        "polly"
    }
}
