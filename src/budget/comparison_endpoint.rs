//! Defines the endpoint comparing a month's budgets with actual spending.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Query, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    budget::{BudgetComparison, comparison::get_budget_comparisons},
    period::{PeriodQuery, resolve_period_query},
    timezone::{get_timezone, local_now},
    user::UserID,
};

/// The state needed to compare budgets with spending.
#[derive(Debug, Clone)]
pub struct BudgetComparisonState {
    /// The database connection for reading budgets and expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetComparisonState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Compare each of the requesting user's budgets for the month against the
/// expenses recorded in that category.
pub async fn get_budget_comparison_endpoint(
    State(state): State<BudgetComparisonState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Query(query), _): WithRejection<Query<PeriodQuery>, Error>,
) -> Result<Json<Vec<BudgetComparison>>, Error> {
    let timezone = get_timezone(&state.local_timezone)?;
    let period = resolve_period_query(query, local_now(timezone), timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_budget_comparisons(user_id, &period, &connection)
        .inspect_err(|error| {
            tracing::error!(
                "could not compare budgets for user {user_id} in {}/{}: {error}",
                period.month,
                period.year
            )
        })
        .map(Json)
}
