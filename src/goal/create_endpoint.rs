//! Defines the endpoint for creating a savings goal.

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
    goal::{NewSavingsGoal, SavingsGoal, create_goal},
    user::UserID,
};

/// The state needed to create a savings goal.
#[derive(Debug, Clone)]
pub struct CreateGoalState {
    /// The database connection for storing goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create a savings goal for the requesting user.
pub async fn create_goal_endpoint(
    State(state): State<CreateGoalState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Json(new_goal), _): WithRejection<Json<NewSavingsGoal>, Error>,
) -> Result<(StatusCode, Json<SavingsGoal>), Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goal = create_goal(user_id, &new_goal, &connection)?;

    Ok((StatusCode::CREATED, Json(goal)))
}
