// End-to-end tests for the DialogTape backend API
//
// Each test gets its own server on an ephemeral port, wired to a fake Gemini
// endpoint (also an axum server) and an in-memory TTS provider. The Gemini
// key pool always starts with a key the fake rejects, so every generation
// goes through key rotation.
//
// Playback and practice are driven the way the Mini App drives them: poll
// the snapshot for the current utterance, then report that it ended.

mod test_analysis;
mod test_dialogue;
mod test_health;
mod test_playback;
mod test_practice;
