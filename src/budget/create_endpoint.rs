//! Defines the endpoint for setting a budget.

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
    budget::{Budget, BudgetChange, BudgetForm, create_or_update_budget},
    user::UserID,
};

/// The state needed to set a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetState {
    /// The database connection for managing budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Set the requesting user's budget for a category and month.
///
/// Responds with `201 Created` when a new budget was inserted and `200 OK`
/// when the amount of an existing budget was replaced.
pub async fn create_or_update_budget_endpoint(
    State(state): State<CreateBudgetState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Json(form), _): WithRejection<Json<BudgetForm>, Error>,
) -> Result<(StatusCode, Json<Budget>), Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let (budget, change) = create_or_update_budget(user_id, &form, &connection)?;

    let status = match change {
        BudgetChange::Created => StatusCode::CREATED,
        BudgetChange::Updated => StatusCode::OK,
    };

    Ok((status, Json(budget)))
}

#[cfg(test)]
mod tests {
    use std::{
        marker::PhantomData,
        sync::{Arc, Mutex},
    };

    use axum::{Extension, Json, extract::State, http::StatusCode};
    use axum_extra::extract::WithRejection;
    use rust_decimal::Decimal;

    use crate::{
        budget::BudgetForm,
        test_utils::{must_create_test_connection, must_create_test_user},
    };

    use super::{CreateBudgetState, create_or_update_budget_endpoint};

    #[tokio::test]
    async fn insert_then_update_status_codes() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);
        let state = CreateBudgetState {
            db_connection: Arc::new(Mutex::new(conn)),
        };
        let form = |amount| BudgetForm {
            category: "Food".to_owned(),
            amount,
            month: 3,
            year: 2024,
        };

        let (first_status, Json(first)) = create_or_update_budget_endpoint(
            State(state.clone()),
            Extension(user.id),
            WithRejection(Json(form(Decimal::from(200))), PhantomData),
        )
        .await
        .unwrap();
        let (second_status, Json(second)) = create_or_update_budget_endpoint(
            State(state),
            Extension(user.id),
            WithRejection(Json(form(Decimal::from(250))), PhantomData),
        )
        .await
        .unwrap();

        assert_eq!(first_status, StatusCode::CREATED);
        assert_eq!(second_status, StatusCode::OK);
        assert_eq!(second.id, first.id);
        assert_eq!(second.amount, Decimal::from(250));
    }
}
