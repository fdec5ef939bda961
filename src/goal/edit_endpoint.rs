//! Defines the endpoints for updating a savings goal and its saved amount.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, Path, State},
};
use axum_extra::extract::WithRejection;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    goal::{
        SavingsGoal, SavingsGoalUpdate,
        core::{set_goal_amount, update_goal},
    },
    user::UserID,
};

/// The state needed to edit a savings goal.
#[derive(Debug, Clone)]
pub struct EditGoalState {
    /// The database connection for updating goals.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditGoalState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The body of a request to replace a goal's saved amount.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GoalAmountForm {
    /// The new saved amount, required.
    #[serde(default)]
    pub amount: Option<Decimal>,
}

/// A savings goal together with whether its target has been reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    /// The updated goal.
    #[serde(flatten)]
    pub goal: SavingsGoal,
    /// Whether the saved amount has reached the target.
    pub is_goal_reached: bool,
}

/// Apply a partial update to one of the requesting user's savings goals.
pub async fn edit_goal_endpoint(
    State(state): State<EditGoalState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(goal_id), _): WithRejection<Path<DatabaseId>, Error>,
    WithRejection(Json(update), _): WithRejection<Json<SavingsGoalUpdate>, Error>,
) -> Result<Json<SavingsGoal>, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    update_goal(goal_id, user_id, &update, &connection).map(Json)
}

/// Replace the saved amount of one of the requesting user's savings goals and
/// report whether the goal has been reached.
pub async fn update_goal_amount_endpoint(
    State(state): State<EditGoalState>,
    Extension(user_id): Extension<UserID>,
    WithRejection(Path(goal_id), _): WithRejection<Path<DatabaseId>, Error>,
    WithRejection(Json(form), _): WithRejection<Json<GoalAmountForm>, Error>,
) -> Result<Json<GoalProgress>, Error> {
    let amount = form
        .amount
        .ok_or_else(|| Error::Validation("Amount is required".to_owned()))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let goal = set_goal_amount(goal_id, user_id, amount, &connection)?;

    Ok(Json(GoalProgress {
        is_goal_reached: goal.is_reached(),
        goal,
    }))
}
