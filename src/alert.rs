//! JSON message bodies for reporting success and failure to API clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// A short, user-facing message, serialized as `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// The text shown to the user.
    pub message: String,
}

impl Alert {
    /// Create a new alert with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Pair the alert with an HTTP status code and turn it into a response.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_response_with_status(StatusCode::OK)
    }
}
