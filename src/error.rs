//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::alert::Alert;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Records owned by another user are reported as not found so that
    /// clients cannot probe for the existence of other users' data.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The request was missing required fields or contained malformed values.
    ///
    /// The message is safe to show to the client.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The request did not identify a known user.
    #[error("the request does not identify a known user")]
    Unauthorized,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

/// Check that the required text field `field_name` is not blank.
///
/// # Errors
/// Returns [Error::Validation] naming the field if `value` is empty or only whitespace.
pub(crate) fn require_text(field_name: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        Err(Error::Validation(format!("{field_name} must not be empty")))
    } else {
        Ok(())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::Validation(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => Alert::new("Resource not found")
                .into_response_with_status(StatusCode::NOT_FOUND),
            Error::Validation(message) => {
                Alert::new(message).into_response_with_status(StatusCode::BAD_REQUEST)
            }
            Error::Unauthorized => Alert::new("Not authorized")
                .into_response_with_status(StatusCode::UNAUTHORIZED),
            Error::InvalidTimezoneError(timezone) => Alert::new(format!(
                "Could not get local timezone \"{timezone}\". Check your server settings and \
                ensure the timezone has been set to a valid, canonical timezone string"
            ))
            .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::new("Something went wrong. Try again later or check the server logs.")
                    .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{
        Error,
        alert::Alert,
        test_utils::{assert_content_type, assert_status, must_parse_json},
    };

    use super::require_text;

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(require_text("category", "Food"), Ok(()));
        assert_eq!(
            require_text("category", "  "),
            Err(Error::Validation("category must not be empty".to_owned()))
        );
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn status_codes_match_error_kind() {
        let cases = [
            (Error::NotFound, StatusCode::NOT_FOUND),
            (Error::Validation("bad".to_owned()), StatusCode::BAD_REQUEST),
            (Error::Unauthorized, StatusCode::UNAUTHORIZED),
            (Error::DatabaseLockError, StatusCode::INTERNAL_SERVER_ERROR),
            (
                Error::InvalidTimezoneError("Nowhere".to_owned()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, want_status) in cases {
            let description = error.to_string();
            let response = error.into_response();
            assert_eq!(response.status(), want_status, "for error {description}");
        }
    }

    #[tokio::test]
    async fn validation_message_is_sent_as_json() {
        let response = Error::Validation("amount is required".to_owned()).into_response();

        assert_status(&response, StatusCode::BAD_REQUEST);
        assert_content_type(&response, "application/json");
        let alert: Alert = must_parse_json(response).await;
        assert_eq!(alert, Alert::new("amount is required"));
    }

    #[tokio::test]
    async fn sql_error_details_are_not_sent() {
        let response = Error::SqlError(rusqlite::Error::InvalidQuery).into_response();

        assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
        let alert: Alert = must_parse_json(response).await;
        assert!(!alert.message.contains("SQL"));
    }
}
