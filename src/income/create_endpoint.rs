//! Defines the endpoint for recording a new income.

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
    income::{Income, NewIncome, create_income},
    user::UserID,
};

/// The state needed to create an income.
#[derive(Debug, Clone)]
pub struct CreateIncomeState {
    /// The database connection for managing incomes.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Record a new income for the requesting user and return it with `201 Created`.
pub async fn create_income_endpoint(
    State(state): State<CreateIncomeState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Json(new_income), _): WithRejection<Json<NewIncome>, Error>,
) -> Result<(StatusCode, Json<Income>), Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let income = create_income(user_id, &new_income, &connection)
        .inspect_err(|error| {
            tracing::debug!("could not create income for user {user_id}: {error}")
        })?;

    Ok((StatusCode::CREATED, Json(income)))
}
