//! Defines the endpoint for listing a month's budgets.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{Budget, get_budgets_for_period},
    period::{PeriodQuery, resolve_period_query},
    timezone::{get_timezone, local_now},
    user::UserID,
};

/// The state needed to list budgets.
#[derive(Debug, Clone)]
pub struct BudgetsState {
    /// The database connection for reading budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// List the requesting user's budgets for the month given by the `month` and
/// `year` query parameters, defaulting to the current month.
pub async fn list_budgets_endpoint(
    State(state): State<BudgetsState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Query(query), _): WithRejection<Query<PeriodQuery>, Error>,
) -> Result<Json<Vec<Budget>>, Error> {
    let timezone = get_timezone(&state.local_timezone)?;
    let period = resolve_period_query(query, local_now(timezone), timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_budgets_for_period(user_id, &period, &connection)
        .inspect_err(|error| tracing::error!("could not get budgets for user {user_id}: {error}"))
        .map(Json)
}
