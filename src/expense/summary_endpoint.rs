//! Defines the endpoint that totals a month's expenses by category.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    aggregation::{CategoryTotal, aggregate_by_category},
    expense::get_expenses_in_period,
    period::{PeriodQuery, resolve_period_query},
    timezone::{get_timezone, local_now},
    user::UserID,
};

/// The state needed to summarize expenses.
#[derive(Debug, Clone)]
pub struct ExpenseSummaryState {
    /// The database connection for reading expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ExpenseSummaryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Total the requesting user's expenses by category for the month given by
/// the `month` and `year` query parameters, largest total first.
pub async fn get_expense_summary_endpoint(
    State(state): State<ExpenseSummaryState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Query(query), _): WithRejection<Query<PeriodQuery>, Error>,
) -> Result<Json<Vec<CategoryTotal>>, Error> {
    let timezone = get_timezone(&state.local_timezone)?;
    let period = resolve_period_query(query, local_now(timezone), timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expenses = get_expenses_in_period(user_id, &period, &connection)
        .inspect_err(|error| {
            tracing::error!("could not get expenses for user {user_id}: {error}")
        })?;

    Ok(Json(aggregate_by_category(&expenses).into_sorted_desc()))
}
