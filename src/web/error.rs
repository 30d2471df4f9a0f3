//! HTTP rendering of [`Error`].
//!
//! Business-rule failures become 4xx responses with a JSON body the client shows next
//! to its form. Infrastructure failures are logged and reported as a generic 500.

use super::LOGIN_PATH;
use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tracing::error;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "field": field }),
            ),
            Self::InsufficientStock {
                available,
                requested,
            } => (
                StatusCode::CONFLICT,
                json!({
                    "error": self.to_string(),
                    "field": "quantity",
                    "available": available,
                    "requested": requested,
                }),
            ),
            Self::DuplicateCategory { .. } => (
                StatusCode::CONFLICT,
                json!({ "error": self.to_string(), "field": "name" }),
            ),
            Self::EmailTaken { .. } => (
                StatusCode::CONFLICT,
                json!({ "error": self.to_string(), "field": "email" }),
            ),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": self.to_string() }),
            ),
            Self::Unauthorized => return Redirect::to(LOGIN_PATH).into_response(),
            Self::PasswordHash { .. } | Self::Config { .. } | Self::Database(_) | Self::Io(_) => {
                error!("Request failed: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
