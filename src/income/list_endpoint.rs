//! Defines the endpoints for listing incomes and fetching a single income.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, Query, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    income::{Income, IncomeFilter, core::get_income, get_incomes},
    user::UserID,
};

/// The state needed to read incomes.
#[derive(Debug, Clone)]
pub struct IncomesState {
    /// The database connection for managing incomes.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IncomesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the requesting user's incomes, most recent first.
///
/// Supports the optional `startDate` and `endDate` query parameters.
pub async fn list_incomes_endpoint(
    State(state): State<IncomesState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Query(filter), _): WithRejection<Query<IncomeFilter>, Error>,
) -> Result<Json<Vec<Income>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_incomes(user_id, &filter, &connection)
        .inspect_err(|error| tracing::error!("could not get incomes for user {user_id}: {error}"))
        .map(Json)
}

/// Get one of the requesting user's incomes.
pub async fn get_income_endpoint(
    State(state): State<IncomesState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(income_id), _): WithRejection<Path<DatabaseId>, Error>,
) -> Result<Json<Income>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_income(income_id, user_id, &connection).map(Json)
}
