pub mod error;
pub mod microphone;
pub mod service;
pub mod session;

pub use error::PracticeError;
pub use microphone::{classify, MicrophoneError, MicrophoneProbe, PermissionState};
pub use service::{FinishedRecording, PracticeDriver};
pub use session::{PracticeSession, TurnState};

use serde::{Deserialize, Serialize};

/// Dialogue speaker; turn `i` belongs to Speaker 1 when `i` is even
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Speaker 1")]
    Speaker1,
    #[serde(rename = "Speaker 2")]
    Speaker2,
}

impl Role {
    pub fn for_turn(index: usize) -> Self {
        if index % 2 == 0 {
            Role::Speaker1
        } else {
            Role::Speaker2
        }
    }

    pub fn owns(&self, index: usize) -> bool {
        Self::for_turn(index) == *self
    }
}

/// Request for POST /api/practice
#[derive(Debug, Serialize, Deserialize)]
pub struct StartPracticeRequest {
    pub text: String,
    pub role: Role,
    #[serde(default)]
    pub speed: Option<f32>,
}

/// Published view of the practice run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeSnapshot {
    pub active: bool,
    pub turn: TurnState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub total_turns: usize,
    pub recording: bool,
    pub recorded_turns: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl PracticeSnapshot {
    pub fn inactive() -> Self {
        Self {
            active: false,
            turn: TurnState::NotStarted,
            role: None,
            total_turns: 0,
            recording: false,
            recorded_turns: Vec::new(),
            last_error: None,
        }
    }
}
