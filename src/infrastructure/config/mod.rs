use anyhow::{bail, Context};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // Gemini
    pub gemini_api_keys: Vec<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout_secs: u64,
    // Speech synthesis
    pub tts_provider: TtsProvider,
    pub aws_region: String,
    pub openai_tts_model: String,
    pub tts_character_budget: usize,
    pub playback_ack_timeout_secs: u64,
    // Client sessions
    pub session_idle_minutes: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// Log format used when `LOG_FORMAT` is unset: JSON for production log shipping
    pub fn default_log_format(&self) -> LogFormat {
        match self {
            Environment::Production => LogFormat::Json,
            Environment::Development => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    Polly,
    OpenAi,
}

impl TtsProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            TtsProvider::Polly => "polly",
            TtsProvider::OpenAi => "openai",
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let gemini_api_keys = collect_api_keys(env::var("GEMINI_API_KEYS").ok(), |n| {
            env::var(format!("GEMINI_API_KEY_{}", n)).ok()
        });
        if gemini_api_keys.is_empty() {
            bail!("GEMINI_API_KEYS (or GEMINI_API_KEY_1..N) must name at least one key");
        }

        let environment =
            Environment::parse(&env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()));
        let log_format = resolve_log_format(env::var("LOG_FORMAT").ok().as_deref(), &environment);

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: numeric_var("PORT", "8080")?,
            environment,
            log_format,
            gemini_api_keys,
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            gemini_timeout_secs: numeric_var("GEMINI_TIMEOUT_SECS", "30")?,
            tts_provider: match env::var("TTS_PROVIDER")
                .unwrap_or_else(|_| "polly".to_string())
                .to_lowercase()
                .as_str()
            {
                "openai" => TtsProvider::OpenAi,
                _ => TtsProvider::Polly,
            },
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".to_string()),
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            tts_character_budget: numeric_var("TTS_CHARACTER_BUDGET", "50000")?,
            playback_ack_timeout_secs: numeric_var("PLAYBACK_ACK_TIMEOUT_SECS", "120")?,
            session_idle_minutes: numeric_var("SESSION_IDLE_MINUTES", "120")?,
        };

        Ok(config)
    }
}

fn numeric_var<T>(name: &str, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_setting(name, env::var(name).ok().as_deref(), default)
}

/// Parse `value` (or `default` when unset), naming the variable on failure
fn parse_setting<T>(name: &str, value: Option<&str>, default: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = value.map(str::trim).unwrap_or(default);
    raw.parse()
        .with_context(|| format!("{} must be a number, got {:?}", name, raw))
}

/// An explicit `LOG_FORMAT` wins; otherwise the environment decides
fn resolve_log_format(explicit: Option<&str>, environment: &Environment) -> LogFormat {
    match explicit.map(|v| v.trim().to_lowercase()).as_deref() {
        Some("json") => LogFormat::Json,
        Some("pretty") => LogFormat::Pretty,
        _ => environment.default_log_format(),
    }
}

/// Build the credential pool, preferring a comma separated list and falling back
/// to numbered variables (`_1`, `_2`, ...) until the first gap.
pub fn collect_api_keys<F>(list: Option<String>, numbered: F) -> Vec<String>
where
    F: Fn(usize) -> Option<String>,
{
    if let Some(list) = list {
        let keys: Vec<String> = list
            .split(',')
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if !keys.is_empty() {
            return keys;
        }
    }

    (1..)
        .map(&numbered)
        .take_while(|k| k.is_some())
        .flatten()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}
