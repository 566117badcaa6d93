use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use staydesk_core::blob::BlobError;
use staydesk_core::error::CoreError;
use staydesk_core::fields::FieldErrors;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as the failure envelope
/// `{ "success": false, "message", "code", "data": null, "errors"? }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Blob store failure outside a best-effort path.
    #[error("Storage error: {0}")]
    Storage(#[from] BlobError),

    /// The request could not be decoded (bad JSON, broken multipart).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The body exceeded the configured upload limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string()),
                CoreError::Validation(errors) => {
                    let body = json!({
                        "success": false,
                        "message": errors.first_message().unwrap_or("The given data was invalid."),
                        "code": "VALIDATION_ERROR",
                        "data": null,
                        "errors": errors,
                    });
                    return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response();
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            },

            AppError::Database(err) => return sqlx_error_response(err),

            AppError::Storage(err) => {
                tracing::error!(error = %err, "Blob store error");
                internal()
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        failure(status, code, message)
    }
}

/// The failure envelope without field errors.
fn failure(status: StatusCode, code: &str, message: String) -> Response {
    let body = json!({
        "success": false,
        "message": message,
        "code": code,
        "data": null,
    });
    (status, axum::Json(body)).into_response()
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Field a constraint guards, and the message shown for it.
///
/// Handlers check these up front; the constraint still fires when two
/// requests race past the check.
fn constraint_field(constraint: &str) -> Option<(&'static str, &'static str)> {
    match constraint {
        "uq_users_email" => Some(("email", "This email is already used.")),
        "uq_users_phone" => Some(("phone", "This phone is already used.")),
        "rooms_property_id_fkey" => Some(("property_id", "The selected property id is invalid.")),
        _ => None,
    }
}

/// Render a sqlx error.
///
/// - `RowNotFound` is 404.
/// - A unique or foreign-key violation on a known constraint is a 422 on
///   the field it guards; other `uq_*` violations are 409.
/// - Everything else is a logged 500 with a generic message.
fn sqlx_error_response(err: &sqlx::Error) -> Response {
    let (status, code, message) = match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err)
            if matches!(db_err.code().as_deref(), Some("23505" | "23503")) =>
        {
            let constraint = db_err.constraint().unwrap_or_default();
            if let Some((field, message)) = constraint_field(constraint) {
                return AppError::Core(CoreError::Validation(FieldErrors::single(field, message)))
                    .into_response();
            }
            if constraint.starts_with("uq_") {
                (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Duplicate value violates unique constraint: {constraint}"),
                )
            } else {
                tracing::error!(error = %db_err, constraint, "Constraint violation");
                internal()
            }
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    };

    failure(status, code, message)
}
