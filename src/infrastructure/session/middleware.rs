use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::registry::{ClientRegistry, ClientState};
use crate::error::AppError;

pub const X_SESSION_ID: &str = "x-session-id";

const MAX_SESSION_ID_LEN: usize = 128;

/// Client session injected into request extensions
#[derive(Clone)]
pub struct ClientSession {
    pub session_id: String,
    pub state: Arc<ClientState>,
}

fn is_valid_session_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_SESSION_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Session middleware: resolves `X-Session-Id` to the client's state
pub async fn session_middleware(
    State(registry): State<Arc<ClientRegistry>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session_id = request
        .headers()
        .get(X_SESSION_ID)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing X-Session-Id header".to_string()))?;

    if !is_valid_session_id(session_id) {
        return Err(AppError::Unauthorized("Invalid X-Session-Id header".to_string()));
    }

    let session_id = session_id.to_string();
    let state = registry.get_or_create(&session_id).await;
    request
        .extensions_mut()
        .insert(ClientSession { session_id, state });

    Ok(next.run(request).await)
}
