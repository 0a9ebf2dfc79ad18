use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware,
    routing::{get, post},
    Router,
};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::infrastructure::config::Config;
use crate::{
    controllers::{
        analysis::AnalysisController,
        dialogue::DialogueController,
        health::{self, Readiness},
        playback, practice,
    },
    domain::{
        analysis::AnalysisService,
        dialogue::DialogueService,
        generation::{KeyRotator, RotatingGenerator},
    },
    infrastructure::{
        repositories::{LanguageModelRepository, SessionStore, TtsRepository},
        session::{
            request_id_middleware, session_middleware, ClientRegistry, ClientSettings, RequestId,
        },
    },
};

/// Recordings are posted as raw audio; everything else is small JSON
const RECORDING_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Wire services and controllers and build the router
pub fn build_app(
    config: &Config,
    language_model: Arc<dyn LanguageModelRepository>,
    tts: Arc<dyn TtsRepository>,
    store: Arc<dyn SessionStore>,
) -> Router {
    // 1. Key rotation shared by every session
    let rotator = Arc::new(KeyRotator::new(config.gemini_api_keys.clone()));
    let generator = Arc::new(RotatingGenerator::new(rotator, language_model));

    // 2. Services
    let analysis_service = Arc::new(AnalysisService::new(generator.clone()));
    let dialogue_service = Arc::new(DialogueService::new(generator.clone()));

    // 3. Client sessions
    let registry = Arc::new(ClientRegistry::new(
        store,
        tts,
        ClientSettings {
            character_budget: config.tts_character_budget,
            ack_timeout: Duration::from_secs(config.playback_ack_timeout_secs),
            idle_timeout: Duration::from_secs(config.session_idle_minutes * 60),
        },
    ));

    // 4. Controllers
    let analysis_controller = Arc::new(AnalysisController::new(analysis_service));
    let dialogue_controller = Arc::new(DialogueController::new(dialogue_service));
    let readiness = Arc::new(Readiness {
        gemini_keys: generator.key_count(),
        tts_provider: registry.tts_provider(),
    });

    let analysis_routes = Router::new()
        .route("/api/analysis", post(AnalysisController::analyze))
        .with_state(analysis_controller);

    let dialogue_routes = Router::new()
        .route("/api/dialogue", post(DialogueController::generate))
        .with_state(dialogue_controller);

    let playback_routes = Router::new()
        .route(
            "/api/playback",
            get(playback::get_playback)
                .post(playback::start_playback)
                .delete(playback::stop_playback),
        )
        .route("/api/playback/ended", post(playback::utterance_ended))
        .route("/api/utterances/:id/audio", get(playback::utterance_audio));

    let practice_routes = Router::new()
        .route(
            "/api/practice",
            get(practice::get_practice)
                .post(practice::start_practice)
                .delete(practice::stop_practice),
        )
        .route("/api/practice/recording/start", post(practice::start_recording))
        .route(
            "/api/practice/recording/stop",
            post(practice::stop_recording).layer(DefaultBodyLimit::max(RECORDING_BODY_LIMIT)),
        )
        .route("/api/practice/skip", post(practice::skip_turn))
        .route("/api/practice/recordings/:index", get(practice::get_recording));

    // Every /api route needs a client session
    let api_routes = Router::new()
        .merge(analysis_routes)
        .merge(dialogue_routes)
        .merge(playback_routes)
        .merge(practice_routes)
        .route_layer(middleware::from_fn_with_state(registry, session_middleware));

    // The Mini App is served from the Telegram web view origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(readiness)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            let request_id = request
                .extensions()
                .get::<RequestId>()
                .map(|id| id.0.as_str())
                .unwrap_or("-");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
