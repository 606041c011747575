/**
 * Routes Module
 * API route handlers
 */
pub mod admin;
pub mod chat;
pub mod contact;
pub mod health;
pub mod portfolio;

use serde::Serialize;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }
}

/// Success response (for delete-style endpoints)
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}
