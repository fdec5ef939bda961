//! Defines the endpoint for deleting a savings goal.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;

use crate::{
    AppState, Error, alert::Alert, database_id::DatabaseId, goal::core::delete_goal, user::UserID,
};

/// The state needed to delete a savings goal.
#[derive(Debug, Clone)]
pub struct DeleteGoalState {
    /// The database connection for deleting goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete one of the requesting user's savings goals.
pub async fn delete_goal_endpoint(
    State(state): State<DeleteGoalState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(goal_id), _): WithRejection<Path<DatabaseId>, Error>,
) -> Result<Alert, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_goal(goal_id, user_id, &connection)? {
        0 => Err(Error::NotFound),
        _ => Ok(Alert::new("Savings goal removed")),
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

    use crate::{
        Error,
        alert::Alert,
        goal::core::{get_goal, test_helpers::must_create_goal},
        test_utils::{must_create_test_connection, must_create_test_user},
    };

    use super::{DeleteGoalState, delete_goal_endpoint};

    #[tokio::test]
    async fn deletes_goal() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);
        let goal = must_create_goal(user.id, "Car", Decimal::from(8000), &conn);
        let state = DeleteGoalState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let got = delete_goal_endpoint(
            State(state.clone()),
            Extension(user.id),
            WithRejection(Path(goal.id), PhantomData),
        )
        .await;

        assert_eq!(got, Ok(Alert::new("Savings goal removed")));
        let connection = state.db_connection.lock().unwrap();
        assert_eq!(get_goal(goal.id, user.id, &connection), Err(Error::NotFound));
    }

    #[tokio::test]
    async fn missing_goal_is_not_found() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);
        let state = DeleteGoalState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let got = delete_goal_endpoint(
            State(state),
            Extension(user.id),
            WithRejection(Path(404), PhantomData),
        )
        .await;

        assert_eq!(got, Err(Error::NotFound));
    }
}
