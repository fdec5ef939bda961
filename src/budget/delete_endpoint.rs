//! Defines the endpoint for deleting a budget.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, budget::core::delete_budget, database_id::DatabaseId,
    user::UserID,
};

/// The state needed to delete a budget.
#[derive(Debug, Clone)]
pub struct DeleteBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete one of the requesting user's budgets.
pub async fn delete_budget_endpoint(
    State(state): State<DeleteBudgetState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(budget_id), _): WithRejection<Path<DatabaseId>, Error>,
) -> Result<Alert, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_budget(budget_id, user_id, &connection)? {
        0 => Err(Error::NotFound),
        _ => Ok(Alert::new("Budget removed")),
    }
}
