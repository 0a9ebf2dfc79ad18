use dialogtape_backend::infrastructure::config::{Config, LogFormat, TtsProvider};
use dialogtape_backend::infrastructure::http::{build_app, start_http_server};
use dialogtape_backend::infrastructure::repositories::{
    GeminiRepository, MokaSessionStore, OpenAiTtsRepository, PollyTtsRepository, TtsRepository,
};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting DialogTape Backend on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        key_count = config.gemini_api_keys.len(),
        model = %config.gemini_model,
        "Gemini key pool loaded"
    );

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Language model client
    let gemini_repo = Arc::new(GeminiRepository::new(
        config.gemini_base_url.clone(),
        config.gemini_model.clone(),
        Duration::from_secs(config.gemini_timeout_secs),
    )
    .context("Failed to build the Gemini HTTP client")?);

    // 2. Speech synthesis provider
    let tts_repo = create_tts_repository(&config).await;

    // 3. Session store shared by every client session
    let session_store = Arc::new(MokaSessionStore::new(Duration::from_secs(
        config.session_idle_minutes * 60,
    )));

    // 4. Router with services and controllers
    let app = build_app(&config, gemini_repo, tts_repo, session_store);

    start_http_server(Arc::new(config), app).await?;

    Ok(())
}

async fn create_tts_repository(config: &Config) -> Arc<dyn TtsRepository> {
    match config.tts_provider {
        TtsProvider::Polly => {
            tracing::info!("Initializing AWS Polly client with region: {}", config.aws_region);

            let has_access_key = std::env::var("AWS_ACCESS_KEY_ID").is_ok();
            let has_secret_key = std::env::var("AWS_SECRET_ACCESS_KEY").is_ok();
            if !has_access_key || !has_secret_key {
                tracing::warn!("AWS credentials not found in environment variables. Will attempt to use other credential providers (instance metadata, etc.)");
            }

            let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(config.aws_region.clone()))
                .load()
                .await;
            tracing::info!(region = ?aws_config.region(), "AWS configuration loaded");

            let polly_client = aws_sdk_polly::Client::new(&aws_config);
            Arc::new(PollyTtsRepository::new(Arc::new(polly_client)))
        }
        TtsProvider::OpenAi => {
            tracing::info!(model = %config.openai_tts_model, "Initializing OpenAI TTS client");
            // Reads OPENAI_API_KEY from the environment
            let client = async_openai::Client::new();
            Arc::new(OpenAiTtsRepository::new(
                Arc::new(client),
                config.openai_tts_model.clone(),
            ))
        }
    }
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "dialogtape_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "dialogtape_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
