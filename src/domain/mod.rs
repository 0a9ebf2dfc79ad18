pub mod analysis;
pub mod cache;
pub mod dialogue;
pub mod generation;
pub mod playback;
pub mod practice;
pub mod shared;
