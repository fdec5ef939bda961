//! Defines the endpoints for listing expenses and fetching a single expense.

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
    expense::{Expense, ExpenseFilter, core::get_expense, get_expenses},
    user::UserID,
};

/// The state needed to read expenses.
#[derive(Debug, Clone)]
pub struct ExpensesState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the requesting user's expenses, most recent first.
///
/// Supports the optional `startDate`, `endDate` and `category` query parameters.
pub async fn list_expenses_endpoint(
    State(state): State<ExpensesState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Query(filter), _): WithRejection<Query<ExpenseFilter>, Error>,
) -> Result<Json<Vec<Expense>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_expenses(user_id, &filter, &connection)
        .inspect_err(|error| tracing::error!("could not get expenses for user {user_id}: {error}"))
        .map(Json)
}

/// Get one of the requesting user's expenses.
pub async fn get_expense_endpoint(
    State(state): State<ExpensesState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(expense_id), _): WithRejection<Path<DatabaseId>, Error>,
) -> Result<Json<Expense>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_expense(expense_id, user_id, &connection).map(Json)
}
