use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// Key the fake server always rejects with 403
pub const REJECTED_KEY: &str = "bad-key";

pub const ANALYSIS_REPLY: &str = "I like tea.---Tôi thích trà.---**\"like\"** là động từ.||Chủ ngữ \"I\".===\
She reads books.---Cô ấy đọc sách.---**\"reads\"** chia ngôi thứ ba.||";

/// Twenty `english---vietnamese---grammar` blocks
pub fn dialogue_reply() -> String {
    (0..20)
        .map(|i| {
            format!(
                "Line number {}.---Câu số {}.---\"Line\" là danh từ.||\"number\" là danh từ.",
                i, i
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[derive(Default)]
struct CallLog {
    keys: Vec<String>,
    prompts: Vec<String>,
}

/// Stand-in for the Gemini generateContent endpoint on an ephemeral port
#[derive(Clone)]
pub struct FakeGemini {
    pub base_url: String,
    log: Arc<Mutex<CallLog>>,
}

impl FakeGemini {
    pub async fn start() -> Self {
        let log = Arc::new(Mutex::new(CallLog::default()));
        let app = Router::new()
            .route("/v1beta/models/:call", post(generate_content))
            .with_state(log.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake Gemini listener");
        let addr = listener.local_addr().expect("Failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            log,
        }
    }

    /// Keys presented so far, in call order
    pub fn keys_seen(&self) -> Vec<String> {
        self.log.lock().unwrap().keys.clone()
    }

    pub fn call_count(&self) -> usize {
        self.log.lock().unwrap().keys.len()
    }

    #[allow(dead_code)]
    pub fn prompts(&self) -> Vec<String> {
        self.log.lock().unwrap().prompts.clone()
    }
}

async fn generate_content(
    State(log): State<Arc<Mutex<CallLog>>>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    let key = query.get("key").cloned().unwrap_or_default();
    let prompt = body["contents"][0]["parts"][0]["text"]
        .as_str()
        .unwrap_or_default()
        .to_string();

    {
        let mut log = log.lock().unwrap();
        log.keys.push(key.clone());
        log.prompts.push(prompt.clone());
    }

    if key == REJECTED_KEY {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": { "message": "API key not valid" } })),
        )
            .into_response();
    }

    let text = if prompt.contains("hội thoại") {
        dialogue_reply()
    } else {
        ANALYSIS_REPLY.to_string()
    };

    Json(json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    }))
    .into_response()
}
