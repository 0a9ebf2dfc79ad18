use axum::{
    body::Body,
    extract::Path,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::playback::{
        PlaybackError, PlaybackOptions, PlaybackRequest, PlaybackSnapshot, PlaybackSource,
        Utterance,
    },
    error::{AppError, AppResult},
    infrastructure::{
        session::{ClientSession, ClientState},
        speech::PublishedUtterance,
    },
};

/// Playback snapshot plus the utterance the client should be playing
#[derive(Debug, Serialize)]
pub struct PlaybackView {
    #[serde(flatten)]
    pub snapshot: PlaybackSnapshot,
    pub current: Option<PublishedUtterance>,
}

/// Request for POST /api/playback/ended
#[derive(Debug, Serialize, Deserialize)]
pub struct UtteranceEndedRequest {
    pub utterance_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UtteranceEndedResponse {
    pub accepted: bool,
}

async fn playback_view(state: &ClientState) -> PlaybackView {
    PlaybackView {
        snapshot: state.playback.snapshot(),
        current: state.speech.current().await,
    }
}

/// Utterances of the cached result set `text` resolves to in `source`
async fn cached_utterances(
    state: &ClientState,
    source: PlaybackSource,
    text: &str,
) -> Result<Vec<Utterance>, PlaybackError> {
    let utterances = match source {
        PlaybackSource::Analysis => state
            .analysis_cache
            .lookup(text)
            .await
            .ok_or(PlaybackError::NotCached)?
            .sentences
            .iter()
            .map(|sentence| Utterance {
                index: sentence.index,
                text: sentence.english.clone(),
            })
            .collect(),
        PlaybackSource::Dialogue => state
            .dialogue_cache
            .lookup(text)
            .await
            .ok_or(PlaybackError::NotCached)?
            .sentences
            .iter()
            .enumerate()
            .map(|(index, turn)| Utterance {
                index,
                text: turn.english.clone(),
            })
            .collect(),
    };
    Ok(utterances)
}

/// POST /api/playback - Read the cached sentences aloud
pub async fn start_playback(
    Extension(session): Extension<ClientSession>,
    Json(request): Json<PlaybackRequest>,
) -> AppResult<Json<PlaybackView>> {
    let speed = PlaybackOptions::validate_speed(request.speed)?;
    if request.text.trim().is_empty() {
        return Err(PlaybackError::NothingToPlay.into());
    }

    let state = &session.state;
    let utterances = cached_utterances(state, request.source, &request.text).await?;

    state
        .start_playback(
            utterances,
            PlaybackOptions {
                speed,
                repeat: request.repeat,
                voices: request.source.voices(),
            },
        )
        .await?;

    tracing::info!(
        session_id = %session.session_id,
        source = ?request.source,
        speed,
        repeat = request.repeat,
        "Playback started"
    );
    Ok(Json(playback_view(state).await))
}

/// GET /api/playback - Current playback state
pub async fn get_playback(
    Extension(session): Extension<ClientSession>,
) -> AppResult<Json<PlaybackView>> {
    Ok(Json(playback_view(&session.state).await))
}

/// DELETE /api/playback - Stop playback
pub async fn stop_playback(
    Extension(session): Extension<ClientSession>,
) -> AppResult<Json<PlaybackView>> {
    session.state.playback.stop().await;
    tracing::info!(session_id = %session.session_id, "Playback stopped");
    Ok(Json(playback_view(&session.state).await))
}

/// POST /api/playback/ended - The client finished playing an utterance
pub async fn utterance_ended(
    Extension(session): Extension<ClientSession>,
    Json(request): Json<UtteranceEndedRequest>,
) -> AppResult<Json<UtteranceEndedResponse>> {
    let accepted = session.state.speech.ended(request.utterance_id).await;
    if !accepted {
        tracing::debug!(
            session_id = %session.session_id,
            utterance_id = %request.utterance_id,
            "Ignoring end report for a stale utterance"
        );
    }
    Ok(Json(UtteranceEndedResponse { accepted }))
}

/// GET /api/utterances/:id/audio - Synthesized audio of the current utterance
pub async fn utterance_audio(
    Extension(session): Extension<ClientSession>,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let audio = session
        .state
        .speech
        .audio(id)
        .await
        .ok_or_else(|| AppError::NotFound("Không tìm thấy âm thanh".to_string()))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("audio/mpeg")),
            (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
        ],
        Body::from(audio.as_ref().clone()),
    )
        .into_response())
}
