pub mod gemini_repository;
pub mod language_model_repository;
pub mod openai_tts_repository;
pub mod polly_tts_repository;
pub mod session_store;
pub mod tts_repository;

pub use gemini_repository::GeminiRepository;
pub use language_model_repository::LanguageModelRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use polly_tts_repository::PollyTtsRepository;
pub use session_store::{MokaSessionStore, SessionStore};
pub use tts_repository::TtsRepository;
