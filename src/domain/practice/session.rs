use super::error::PracticeError;
use super::Role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum TurnState {
    NotStarted,
    /// A line the app speaks on its own
    SystemTurn(usize),
    /// A line the user reads and records
    UserTurn(usize),
    Finished,
}

/// Turn-taking state of one role-play run over a dialogue
#[derive(Debug, Clone)]
pub struct PracticeSession {
    role: Role,
    total_turns: usize,
    state: TurnState,
    recording: bool,
}

impl PracticeSession {
    pub fn new(role: Role, total_turns: usize) -> Self {
        Self {
            role,
            total_turns,
            state: TurnState::NotStarted,
            recording: false,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn total_turns(&self) -> usize {
        self.total_turns
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn start(&mut self) -> TurnState {
        self.enter(0)
    }

    fn enter(&mut self, index: usize) -> TurnState {
        self.recording = false;
        self.state = if index >= self.total_turns {
            TurnState::Finished
        } else if self.role.owns(index) {
            TurnState::UserTurn(index)
        } else {
            TurnState::SystemTurn(index)
        };
        self.state
    }

    /// Move past the current turn, recorded or not
    pub fn advance(&mut self) -> Result<TurnState, PracticeError> {
        match self.state {
            TurnState::SystemTurn(index) | TurnState::UserTurn(index) => Ok(self.enter(index + 1)),
            TurnState::NotStarted | TurnState::Finished => Err(PracticeError::NotActive),
        }
    }

    pub fn begin_recording(&mut self) -> Result<usize, PracticeError> {
        match self.state {
            TurnState::UserTurn(_) if self.recording => Err(PracticeError::AlreadyRecording),
            TurnState::UserTurn(index) => {
                self.recording = true;
                Ok(index)
            }
            TurnState::SystemTurn(_) => Err(PracticeError::NotUserTurn),
            TurnState::NotStarted | TurnState::Finished => Err(PracticeError::NotActive),
        }
    }

    /// Close the open recording and return the turn it belongs to
    pub fn finish_recording(&mut self) -> Result<usize, PracticeError> {
        match self.state {
            TurnState::UserTurn(index) if self.recording => {
                self.recording = false;
                Ok(index)
            }
            TurnState::UserTurn(_) => Err(PracticeError::NotRecording),
            TurnState::SystemTurn(_) => Err(PracticeError::NotUserTurn),
            TurnState::NotStarted | TurnState::Finished => Err(PracticeError::NotActive),
        }
    }
}
