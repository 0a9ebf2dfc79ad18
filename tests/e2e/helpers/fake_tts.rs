use async_trait::async_trait;
use dialogtape_backend::domain::playback::Voice;
use dialogtape_backend::infrastructure::repositories::TtsRepository;
use std::sync::Mutex;

/// In-memory TTS provider: the "audio" is the text behind a fixed prefix
#[derive(Default)]
pub struct FakeTts {
    calls: Mutex<Vec<(String, Voice, f32)>>,
}

impl FakeTts {
    pub fn audio_for(text: &str) -> Vec<u8> {
        [b"ID3".as_slice(), text.as_bytes()].concat()
    }

    pub fn calls(&self) -> Vec<(String, Voice, f32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TtsRepository for FakeTts {
    async fn synthesize(&self, text: &str, voice: Voice, rate: f32) -> Result<Vec<u8>, String> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), voice, rate));
        Ok(Self::audio_for(text))
    }

    fn provider(&self) -> &'static str {
        "fake"
    }
}
