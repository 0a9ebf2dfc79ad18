pub mod budget;
pub mod engine;
pub mod error;
pub mod orchestrator;

pub use budget::CharacterBudget;
pub use engine::{SpeechEngine, SpeechError};
pub use error::PlaybackError;
pub use orchestrator::PlaybackOrchestrator;

use serde::{Deserialize, Serialize};

/// Utterances longer than this are skipped
pub const MAX_UTTERANCE_CHARS: usize = 1000;
/// Pause between two cycles of a repeating playback
pub const REPEAT_PAUSE_SECS: u64 = 10;

pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 2.0;
pub const DEFAULT_SPEED: f32 = 1.0;

/// Synthesis voice identities the Mini App knows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Voice {
    #[serde(rename = "UK English Female")]
    UkEnglishFemale,
    #[serde(rename = "US English Male")]
    UsEnglishMale,
}

impl Voice {
    pub fn as_str(&self) -> &'static str {
        match self {
            Voice::UkEnglishFemale => "UK English Female",
            Voice::UsEnglishMale => "US English Male",
        }
    }
}

/// How a voice is chosen for each utterance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceSchedule {
    /// Even indices speak with the female voice, odd with the male one
    Alternating,
    Single(Voice),
}

impl VoiceSchedule {
    pub fn voice_for(&self, index: usize) -> Voice {
        match self {
            VoiceSchedule::Alternating if index % 2 == 0 => Voice::UkEnglishFemale,
            VoiceSchedule::Alternating => Voice::UsEnglishMale,
            VoiceSchedule::Single(voice) => *voice,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechOptions {
    pub voice: Voice,
    pub rate: f32,
    pub volume: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackOptions {
    pub speed: f32,
    pub repeat: bool,
    pub voices: VoiceSchedule,
}

impl PlaybackOptions {
    /// Speed from a request, defaulting to 1.0 and bounded to 0.5..=2.0
    pub fn validate_speed(speed: Option<f32>) -> Result<f32, PlaybackError> {
        let speed = speed.unwrap_or(DEFAULT_SPEED);
        if (MIN_SPEED..=MAX_SPEED).contains(&speed) {
            Ok(speed)
        } else {
            Err(PlaybackError::InvalidSpeed(speed))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Starting,
    Speaking { index: usize },
    Pausing,
}

/// Published view of one session's playback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    #[serde(flatten)]
    pub state: PlaybackState,
    pub repeat: bool,
    pub repeat_count: u32,
    pub total_utterances: usize,
    pub characters_spoken: usize,
    pub character_limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl PlaybackSnapshot {
    pub fn idle(character_limit: usize) -> Self {
        Self {
            state: PlaybackState::Idle,
            repeat: false,
            repeat_count: 0,
            total_utterances: 0,
            characters_spoken: 0,
            character_limit,
            last_error: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state != PlaybackState::Idle
    }
}

/// Which cached result set a playback request refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackSource {
    Analysis,
    Dialogue,
}

impl PlaybackSource {
    /// Analysis playback reads every sentence with one voice; dialogue alternates
    pub fn voices(&self) -> VoiceSchedule {
        match self {
            PlaybackSource::Analysis => VoiceSchedule::Single(Voice::UsEnglishMale),
            PlaybackSource::Dialogue => VoiceSchedule::Alternating,
        }
    }
}

/// Request for POST /api/playback
#[derive(Debug, Serialize, Deserialize)]
pub struct PlaybackRequest {
    pub source: PlaybackSource,
    pub text: String,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub repeat: bool,
}
