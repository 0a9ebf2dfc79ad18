use axum::{
    body::{Body, Bytes},
    extract::Path,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    domain::{
        cache::RecordingRef,
        playback::PlaybackOptions,
        practice::{MicrophoneProbe, PracticeError, PracticeSnapshot, StartPracticeRequest},
    },
    error::{AppError, AppResult},
    infrastructure::{
        session::{ClientSession, ClientState, StoredRecording},
        speech::PublishedUtterance,
    },
};

const DEFAULT_RECORDING_TYPE: &str = "audio/webm";

/// Practice snapshot plus the system line the client should be playing
#[derive(Debug, Serialize)]
pub struct PracticeView {
    #[serde(flatten)]
    pub snapshot: PracticeSnapshot,
    pub current: Option<PublishedUtterance>,
}

/// Response for POST /api/practice/recording/stop
#[derive(Debug, Serialize)]
pub struct RecordingSaved {
    pub recording: RecordingRef,
    pub practice: PracticeView,
}

async fn practice_view(state: &ClientState) -> PracticeView {
    PracticeView {
        snapshot: state.practice.snapshot().await,
        current: state.speech.current().await,
    }
}

/// POST /api/practice - Enter role-play practice on a cached dialogue
pub async fn start_practice(
    Extension(session): Extension<ClientSession>,
    Json(request): Json<StartPracticeRequest>,
) -> AppResult<Json<PracticeView>> {
    let speed = PlaybackOptions::validate_speed(request.speed)?;
    let state = &session.state;

    let entry = state
        .dialogue_cache
        .lookup(&request.text)
        .await
        .ok_or(PracticeError::NotCached)?;
    let lines: Vec<String> = entry.sentences.iter().map(|turn| turn.english.clone()).collect();

    state
        .start_practice(request.text, lines, request.role, speed)
        .await?;

    tracing::info!(
        session_id = %session.session_id,
        role = ?request.role,
        speed,
        "Practice mode entered"
    );
    Ok(Json(practice_view(state).await))
}

/// GET /api/practice - Current practice state
pub async fn get_practice(
    Extension(session): Extension<ClientSession>,
) -> AppResult<Json<PracticeView>> {
    Ok(Json(practice_view(&session.state).await))
}

/// DELETE /api/practice - Leave practice mode
pub async fn stop_practice(
    Extension(session): Extension<ClientSession>,
) -> AppResult<Json<PracticeView>> {
    session.state.practice.stop().await;
    Ok(Json(practice_view(&session.state).await))
}

/// POST /api/practice/recording/start - Begin recording the user's line
pub async fn start_recording(
    Extension(session): Extension<ClientSession>,
    Json(probe): Json<MicrophoneProbe>,
) -> AppResult<Json<PracticeView>> {
    let index = session.state.practice.begin_recording(&probe).await?;
    tracing::info!(session_id = %session.session_id, turn_index = index, "Recording begun");
    Ok(Json(practice_view(&session.state).await))
}

/// POST /api/practice/recording/stop - Upload the recording and move on
pub async fn stop_recording(
    Extension(session): Extension<ClientSession>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<RecordingSaved>> {
    if body.is_empty() {
        return Err(PracticeError::EmptyRecording.into());
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .filter(|v| v.starts_with("audio/"))
        .unwrap_or(DEFAULT_RECORDING_TYPE)
        .to_string();

    let state = &session.state;
    let finished = state.practice.finish_recording().await?;

    let recording = RecordingRef {
        id: Uuid::new_v4(),
        turn_index: finished.turn_index,
        content_type: content_type.clone(),
        byte_len: body.len(),
        captured_at: Utc::now(),
    };
    state
        .recordings
        .insert(
            recording.id,
            StoredRecording {
                content_type,
                audio: body,
            },
        )
        .await;

    if state
        .dialogue_cache
        .attach_recording(&finished.dialogue_key, recording.clone())
        .await
        .is_none()
    {
        tracing::warn!(
            session_id = %session.session_id,
            turn_index = finished.turn_index,
            "Dialogue entry expired, recording kept without a cache reference"
        );
    }

    tracing::info!(
        session_id = %session.session_id,
        turn_index = recording.turn_index,
        byte_len = recording.byte_len,
        "Recording saved"
    );
    Ok(Json(RecordingSaved {
        recording,
        practice: practice_view(state).await,
    }))
}

/// POST /api/practice/skip - Move to the next turn without recording
pub async fn skip_turn(
    Extension(session): Extension<ClientSession>,
) -> AppResult<Json<PracticeView>> {
    session.state.practice.skip().await?;
    Ok(Json(practice_view(&session.state).await))
}

/// GET /api/practice/recordings/:index - Audio recorded for a turn of the
/// latest practice dialogue
pub async fn get_recording(
    Extension(session): Extension<ClientSession>,
    Path(index): Path<usize>,
) -> AppResult<Response> {
    let not_found = || AppError::NotFound("Không tìm thấy bản ghi âm".to_string());
    let state = &session.state;

    let key = state.practice_key().await.ok_or_else(not_found)?;
    let entry = state.dialogue_cache.lookup(&key).await.ok_or_else(not_found)?;
    let reference = entry.recordings.get(&index).ok_or_else(not_found)?;
    let stored = state.recordings.get(reference.id).await.ok_or_else(not_found)?;

    let content_type = HeaderValue::from_str(&stored.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_RECORDING_TYPE));
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        Body::from(stored.audio.clone()),
    )
        .into_response())
}
