//! Defines the endpoint for updating an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    expense::{Expense, ExpenseUpdate, core::update_expense},
    user::UserID,
};

/// The state needed to edit an expense.
#[derive(Debug, Clone)]
pub struct EditExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Apply a partial update to one of the requesting user's expenses.
pub async fn edit_expense_endpoint(
    State(state): State<EditExpenseState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(expense_id), _): WithRejection<Path<DatabaseId>, Error>,
    WithRejection(Json(update), _): WithRejection<Json<ExpenseUpdate>, Error>,
) -> Result<Json<Expense>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_expense(expense_id, user_id, &update, &connection)
        .inspect_err(|error| tracing::debug!("could not update expense {expense_id}: {error}"))
        .map(Json)
}
