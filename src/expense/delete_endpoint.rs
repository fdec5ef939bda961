//! Defines the endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, database_id::DatabaseId, expense::core::delete_expense,
    user::UserID,
};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete one of the requesting user's expenses.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(expense_id), _): WithRejection<Path<DatabaseId>, Error>,
) -> Result<Alert, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_expense(expense_id, user_id, &connection) {
        Ok(0) => Err(Error::NotFound),
        Ok(_) => Ok(Alert::new("Expense removed")),
        Err(error) => {
            tracing::error!("Could not delete expense {expense_id}: {error}");
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        marker::PhantomData,
        sync::{Arc, Mutex},
    };

    use axum::{
        Extension,
        extract::{Path, State},
    };
    use axum_extra::extract::WithRejection;
    use rust_decimal::Decimal;
    use time::macros::datetime;

    use crate::{
        Error,
        alert::Alert,
        expense::must_create_expense,
        test_utils::{must_create_test_connection, must_create_test_user},
    };

    use super::{DeleteExpenseState, delete_expense_endpoint};

    #[tokio::test]
    async fn deletes_expense_once() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);
        let expense = must_create_expense(
            user.id,
            "Food",
            Decimal::TEN,
            datetime!(2024-05-01 00:00 UTC),
            &conn,
        );
        let state = DeleteExpenseState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let first = delete_expense_endpoint(
            State(state.clone()),
            Extension(user.id),
            WithRejection(Path(expense.id), PhantomData),
        )
        .await;
        let second = delete_expense_endpoint(
            State(state),
            Extension(user.id),
            WithRejection(Path(expense.id), PhantomData),
        )
        .await;

        assert_eq!(first, Ok(Alert::new("Expense removed")));
        assert_eq!(second, Err(Error::NotFound));
    }
}
