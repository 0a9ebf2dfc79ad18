use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::analysis::{AnalysisResponse, AnalysisService, AnalysisServiceApi, AnalyzeRequest},
    error::AppResult,
    infrastructure::session::ClientSession,
};

pub struct AnalysisController {
    analysis_service: Arc<AnalysisService>,
}

impl AnalysisController {
    pub fn new(analysis_service: Arc<AnalysisService>) -> Self {
        Self { analysis_service }
    }

    /// POST /api/analysis - Translate and explain a paragraph sentence by sentence
    pub async fn analyze(
        State(controller): State<Arc<AnalysisController>>,
        Extension(session): Extension<ClientSession>,
        Json(request): Json<AnalyzeRequest>,
    ) -> AppResult<Json<AnalysisResponse>> {
        let state = &session.state;
        let outcome = controller
            .analysis_service
            .analyze(&state.analysis_cache, &state.analysis_supersede, &request.text)
            .await?;

        tracing::info!(
            session_id = %session.session_id,
            status = outcome.status(),
            "Analysis answered"
        );
        Ok(Json(AnalysisResponse::from(&outcome)))
    }
}
