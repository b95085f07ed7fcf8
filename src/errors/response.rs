use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use urlencoding;

use crate::errors::AppError;

// The IntoResponse trait implementation converts AppError into a well-formed HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Authentication errors redirect to login
            AppError::Auth(msg) => {
                Redirect::to(&format!("/login?error={}", urlencoding::encode(&msg)))
                    .into_response()
            }

            // Validation failures carry a user-facing message
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": msg })),
            )
                .into_response(),

            AppError::TaskNotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Task not found or access denied" })),
            )
                .into_response(),

            // Duplicate identities are surfaced distinctly so the client can
            // offer a redirect to login.
            AppError::DuplicateUsername(username) => (
                StatusCode::CONFLICT,
                Json(json!({
                    "message": format!(
                        "🏄‍♀️ The beach name \"{}\" is already taken! Try another wave-rider name.",
                        username
                    )
                })),
            )
                .into_response(),

            AppError::DuplicateEmail => (
                StatusCode::CONFLICT,
                Json(json!({
                    "message": "📧 This email is already riding the waves with us! Try logging in instead."
                })),
            )
                .into_response(),

            // Storage and document faults are internal server errors
            AppError::Storage(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Storage error: {}", e) })),
            )
                .into_response(),

            AppError::Document(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Document error: {}", e) })),
            )
                .into_response(),

            AppError::PasswordHash(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Password error: {}", e) })),
            )
                .into_response(),
        }
    }
}
