use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::models::MessageResponse;

/// ApiError
///
/// The user-visible failure taxonomy of the operation layer. FORBIDDEN and
/// NOT_FOUND carry distinct, stable messages so clients can tell "you may not
/// see this" apart from "this does not exist", consistently across all
/// actions. Guard denials are mapped into these variants by the handlers;
/// the guard itself never constructs one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No usable principal for an action that requires one (401).
    AuthRequired,
    /// The entry exists but the guard denied the action (403).
    Forbidden,
    /// The entry id did not resolve (404).
    NotFound,
    /// Malformed create payload (400).
    Validation(String),
    /// A collaborator failed in a way the core does not recover from (500).
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::AuthRequired => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::AuthRequired => "Error: Authentication required.".to_string(),
            ApiError::Forbidden => {
                "Error: You don't have permission to access this entry.".to_string()
            }
            ApiError::NotFound => "Error: Entry not found.".to_string(),
            ApiError::Validation(reason) => format!("Error: {}", reason),
            ApiError::Internal => "Error: Internal server error.".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = MessageResponse {
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    /// Store failures are fatal to the current action, not retried here.
    fn from(e: sqlx::Error) -> Self {
        tracing::error!("entry store error: {:?}", e);
        ApiError::Internal
    }
}
