//! Defines the endpoint for recording a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{Expense, NewExpense, create_expense},
    user::UserID,
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Record a new expense for the requesting user and return it with `201 Created`.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Json(new_expense), _): WithRejection<Json<NewExpense>, Error>,
) -> Result<(StatusCode, Json<Expense>), Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = create_expense(user_id, &new_expense, &connection)
        .inspect_err(|error| {
            tracing::debug!("could not create expense for user {user_id}: {error}")
        })?;

    Ok((StatusCode::CREATED, Json(expense)))
}
