use crate::fields::FieldErrors;
use crate::types::DbId;

/// Failures that belong to the domain rather than to HTTP or storage.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// `entity` is the display name used in the 404 message, e.g. `"Room"`.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Missing, malformed or expired credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role is not admitted.
    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl CoreError {
    /// Validation failure against a single field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation(FieldErrors::single(field, message))
    }
}
