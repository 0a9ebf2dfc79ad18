use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::dialogue::{DialogueRequest, DialogueResponse, DialogueService, DialogueServiceApi},
    error::AppResult,
    infrastructure::session::ClientSession,
};

pub struct DialogueController {
    dialogue_service: Arc<DialogueService>,
}

impl DialogueController {
    pub fn new(dialogue_service: Arc<DialogueService>) -> Self {
        Self { dialogue_service }
    }

    /// POST /api/dialogue - Turn a paragraph into a practice dialogue
    pub async fn generate(
        State(controller): State<Arc<DialogueController>>,
        Extension(session): Extension<ClientSession>,
        Json(request): Json<DialogueRequest>,
    ) -> AppResult<Json<DialogueResponse>> {
        let state = &session.state;
        let outcome = controller
            .dialogue_service
            .generate(&state.dialogue_cache, &state.dialogue_supersede, &request.text)
            .await?;

        tracing::info!(
            session_id = %session.session_id,
            status = outcome.status(),
            "Dialogue answered"
        );
        Ok(Json(DialogueResponse::from(&outcome)))
    }
}
