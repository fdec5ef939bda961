//! Defines the endpoints for reading savings goals.

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
    goal::{
        SavingsGoal,
        core::{get_goal, get_goals},
    },
    user::UserID,
};

/// The state needed to list savings goals.
#[derive(Debug, Clone)]
pub struct GoalsState {
    /// The database connection for reading goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// List the requesting user's savings goals, newest first.
pub async fn list_goals_endpoint(
    State(state): State<GoalsState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<SavingsGoal>>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_goals(user_id, &connection).map(Json)
}

/// Get one of the requesting user's savings goals.
pub async fn get_goal_endpoint(
    State(state): State<GoalsState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(goal_id), _): WithRejection<Path<DatabaseId>, Error>,
) -> Result<Json<SavingsGoal>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    get_goal(goal_id, user_id, &connection).map(Json)
}
