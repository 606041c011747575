/**
 * Contact Routes
 * Contact-form intake: store the message, then forward it by email.
 */
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::mailer::Mailer;
use crate::routes::ErrorResponse;
use crate::store::models::NewContactMessage;
use crate::{config, store};

pub const CONTACT_MESSAGES: &str = "contact_messages";

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub saved: bool,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /api/contact
///
/// The message is always stored when the store is up. Email forwarding is
/// a separate concern: missing credentials or a delivery failure degrade
/// only that half of the response.
pub async fn submit_contact(Json(payload): Json<ContactRequest>) -> Response {
    let name = payload.name.trim();
    let email = payload.email.trim();
    let message = payload.message.trim();

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Name, email and message are required")),
        )
            .into_response();
    }
    if !EMAIL_REGEX.is_match(email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Invalid email address")),
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

    let row = NewContactMessage {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
        is_read: false,
    };
    if let Err(e) = store.insert_only(CONTACT_MESSAGES, &[row]).await {
        tracing::error!(error = %e, "failed to store contact message");
        return (
            StatusCode::BAD_GATEWAY,
            Json(ContactResponse {
                saved: false,
                email_sent: false,
                error: Some(e.to_string()),
            }),
        )
            .into_response();
    }

    let (email_sent, error) = match config::get().and_then(|c| c.email.clone()) {
        Some(email_config) => {
            match Mailer::new(email_config)
                .send_contact(name, email, message)
                .await
            {
                Ok(()) => (true, None),
                Err(e) => {
                    tracing::error!(error = %e, "contact email delivery failed");
                    (false, Some(e))
                }
            }
        }
        None => (false, Some("Email delivery is not configured".to_string())),
    };

    (
        StatusCode::OK,
        Json(ContactResponse {
            saved: true,
            email_sent,
            error,
        }),
    )
        .into_response()
}
