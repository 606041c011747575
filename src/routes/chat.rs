/**
 * Chat Routes
 * The FAQ chatbot endpoint.
 */
use std::time::Instant;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::routes::ErrorResponse;
use crate::{chatbot, config, store};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: String,
}

/// POST /api/chat
///
/// The context is re-fetched for every message; the reply generator tries
/// the generative call first when configured and always lands on the rule
/// engine otherwise.
pub async fn send_message(Json(payload): Json<ChatRequest>) -> Response {
    let message = payload.message.trim();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Message is required")),
        )
            .into_response();
    }

    let Some(store) = store::get_store() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Store not available")),
        )
            .into_response();
    };

    let started = Instant::now();
    let context = chatbot::load_context(&store).await;
    let gemini_api_key = config::get().and_then(|c| c.gemini_api_key.as_deref());
    let reply = chatbot::generate_response(message, &context, gemini_api_key).await;

    let session_id = payload
        .session_id
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    chatbot::save_history(
        &store,
        &session_id,
        message,
        &reply,
        started.elapsed().as_millis() as i64,
    )
    .await;

    (StatusCode::OK, Json(ChatResponse { reply, session_id })).into_response()
}
