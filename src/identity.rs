//! Middleware that identifies the user a request is made on behalf of.
//!
//! Authentication happens upstream. Requests arrive with the authenticated
//! user's ID in the [USER_ID_HEADER] header and this middleware checks that
//! the ID belongs to a known user before letting the request through.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    user::{UserID, get_user_by_id},
};

/// The header that carries the ID of the requesting user.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The state needed for the identity middleware.
#[derive(Debug, Clone)]
pub struct IdentityState {
    /// The database connection for looking up users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IdentityState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Middleware function that checks the request identifies a known user.
///
/// The user ID is placed into the request extensions and the request executed
/// normally if the user exists, otherwise a 401 Unauthorized response is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>`
/// to receive the user ID.
pub async fn identity_guard(
    State(state): State<IdentityState>,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = match identify_user(request.headers(), &state) {
        Ok(user_id) => user_id,
        Err(error) => return error.into_response(),
    };

    request.extensions_mut().insert(user_id);
    next.run(request).await
}

fn identify_user(headers: &HeaderMap, state: &IdentityState) -> Result<UserID, Error> {
    let user_id = parse_user_id(headers)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match get_user_by_id(user_id, &connection) {
        Ok(user) => Ok(user.id),
        Err(Error::NotFound) => {
            tracing::debug!("rejected request for unknown user {user_id}");
            Err(Error::Unauthorized)
        }
        Err(error) => Err(error),
    }
}

fn parse_user_id(headers: &HeaderMap) -> Result<UserID, Error> {
    let value = headers.get(USER_ID_HEADER).ok_or(Error::Unauthorized)?;

    value
        .to_str()
        .ok()
        .and_then(|text| text.trim().parse::<i64>().ok())
        .map(UserID::new)
        .ok_or_else(|| {
            tracing::debug!("rejected request with malformed user ID {value:?}");
            Error::Unauthorized
        })
}
