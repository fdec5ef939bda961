//! Defines the endpoint for deleting an income.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, database_id::DatabaseId, income::core::delete_income,
    user::UserID,
};

/// The state needed to delete an income.
#[derive(Debug, Clone)]
pub struct DeleteIncomeState {
    /// The database connection for managing incomes.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteIncomeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete one of the requesting user's incomes.
pub async fn delete_income_endpoint(
    State(state): State<DeleteIncomeState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(income_id), _): WithRejection<Path<DatabaseId>, Error>,
) -> Result<Alert, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_income(income_id, user_id, &connection) {
        Ok(0) => Err(Error::NotFound),
        Ok(_) => Ok(Alert::new("Income removed")),
        Err(error) => {
            tracing::error!("Could not delete income {income_id}: {error}");
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
        income::must_create_income,
        test_utils::{must_create_test_connection, must_create_test_user},
    };

    use super::{DeleteIncomeState, delete_income_endpoint};

    #[tokio::test]
    async fn deletes_income_once() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);
        let income = must_create_income(
            user.id,
            "Salary",
            Decimal::TEN,
            datetime!(2024-05-01 00:00 UTC),
            &conn,
        );
        let state = DeleteIncomeState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let first = delete_income_endpoint(
            State(state.clone()),
            Extension(user.id),
            WithRejection(Path(income.id), PhantomData),
        )
        .await;
        let second = delete_income_endpoint(
            State(state),
            Extension(user.id),
            WithRejection(Path(income.id), PhantomData),
        )
        .await;

        assert_eq!(first, Ok(Alert::new("Income removed")));
        assert_eq!(second, Err(Error::NotFound));
    }
}
