pub mod analysis;
pub mod dialogue;
pub mod health;
pub mod playback;
pub mod practice;
