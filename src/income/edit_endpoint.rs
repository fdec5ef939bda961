//! Defines the endpoint for updating an income.

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
    income::{Income, IncomeUpdate, core::update_income},
    user::UserID,
};

/// The state needed to edit an income.
#[derive(Debug, Clone)]
pub struct EditIncomeState {
    /// The database connection for managing incomes.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Apply a partial update to one of the requesting user's incomes.
pub async fn edit_income_endpoint(
    State(state): State<EditIncomeState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(income_id), _): WithRejection<Path<DatabaseId>, Error>,
    WithRejection(Json(update), _): WithRejection<Json<IncomeUpdate>, Error>,
) -> Result<Json<Income>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_income(income_id, user_id, &update, &connection)
        .inspect_err(|error| tracing::debug!("could not update income {income_id}: {error}"))
        .map(Json)
}
