//! Success envelope shared by every handler.
//!
//! All successful responses have the shape
//! `{ "success": true, "message"?: string, "data": T }`. Failures are rendered
//! by [`AppError`](crate::error::AppError).

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
        }
    }
}

impl ApiResponse<()> {
    /// Acknowledgement with `data: null`, used by deletes and logout.
    pub fn ack(message: impl Into<String>) -> Self {
        Self::with_message(message, ())
    }
}
