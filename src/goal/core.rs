//! Defines the savings goal model and its database queries.

use rusqlite::{Connection, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    amount::{get_amount, require_amount},
    database_id::{DatabaseId, RowsAffected},
    error::require_text,
    user::UserID,
};

/// An amount of money the user is saving towards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    /// The ID of the goal.
    pub id: DatabaseId,
    /// The user saving towards the goal.
    pub user_id: UserID,
    /// What the user is saving for, e.g. "Holiday".
    pub name: String,
    /// How much the user wants to save.
    pub target_amount: Decimal,
    /// How much has been saved so far.
    pub current_amount: Decimal,
    /// When the user wants to reach the target by.
    #[serde(with = "time::serde::rfc3339::option")]
    pub target_date: Option<OffsetDateTime>,
    /// Free text notes.
    pub description: Option<String>,
    /// When the goal was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl SavingsGoal {
    /// Whether the saved amount has reached the target.
    pub fn is_reached(&self) -> bool {
        self.current_amount >= self.target_amount
    }
}

/// The fields needed to create a savings goal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingsGoal {
    /// What the user is saving for, must not be blank.
    pub name: String,
    /// How much the user wants to save.
    pub target_amount: Decimal,
    /// Defaults to zero.
    #[serde(default)]
    pub current_amount: Decimal,
    /// When the user wants to reach the target by.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub target_date: Option<OffsetDateTime>,
    /// Free text notes.
    #[serde(default)]
    pub description: Option<String>,
}

/// A partial update to a savings goal. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SavingsGoalUpdate {
    /// The new name, must not be blank.
    pub name: Option<String>,
    /// The new amount to save up to.
    pub target_amount: Option<Decimal>,
    /// The new amount saved so far.
    pub current_amount: Option<Decimal>,
    /// The new date to reach the target by.
    #[serde(with = "time::serde::rfc3339::option")]
    pub target_date: Option<OffsetDateTime>,
    /// Free text notes.
    pub description: Option<String>,
}

pub fn create_goal_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS savings_goal (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            target_amount TEXT NOT NULL,
            current_amount TEXT NOT NULL DEFAULT '0',
            target_date TEXT,
            description TEXT,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_goal(row: &Row) -> Result<SavingsGoal, rusqlite::Error> {
    Ok(SavingsGoal {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        name: row.get(2)?,
        target_amount: get_amount(row, 3)?,
        current_amount: get_amount(row, 4)?,
        target_date: row.get(5)?,
        description: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Create a savings goal for `user_id`.
///
/// # Errors
/// Returns an [Error::Validation] if the name is blank or an amount is out of
/// range, or an [Error::SqlError] if the insert failed.
pub fn create_goal(
    user_id: UserID,
    goal: &NewSavingsGoal,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    require_text("name", &goal.name)?;
    require_amount("targetAmount", goal.target_amount)?;
    require_amount("currentAmount", goal.current_amount)?;

    connection
        .prepare(
            "INSERT INTO savings_goal
                (user_id, name, target_amount, current_amount, target_date, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, name, target_amount, current_amount, target_date, description, created_at",
        )?
        .query_row(
            (
                user_id.as_i64(),
                &goal.name,
                goal.target_amount.to_string(),
                goal.current_amount.to_string(),
                goal.target_date.map(|date| date.to_offset(UtcOffset::UTC)),
                &goal.description,
                OffsetDateTime::now_utc(),
            ),
            map_row_to_goal,
        )
        .map_err(Error::from)
}

/// Get the savings goal `id` owned by `user_id`.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no such goal for the user.
pub fn get_goal(
    id: DatabaseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, target_amount, current_amount, target_date, description, created_at
             FROM savings_goal
             WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row((id, user_id.as_i64()), map_row_to_goal)
        .map_err(Error::from)
}

/// Get all savings goals of `user_id`, newest first.
pub fn get_goals(user_id: UserID, connection: &Connection) -> Result<Vec<SavingsGoal>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, target_amount, current_amount, target_date, description, created_at
             FROM savings_goal
             WHERE user_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map((user_id.as_i64(),), map_row_to_goal)?
        .map(|maybe_goal| maybe_goal.map_err(Error::from))
        .collect()
}

/// Apply `update` to the savings goal `id` owned by `user_id`.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no such goal for the user, or an
/// [Error::Validation] if a new value is invalid.
pub fn update_goal(
    id: DatabaseId,
    user_id: UserID,
    update: &SavingsGoalUpdate,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    if let Some(name) = &update.name {
        require_text("name", name)?;
    }
    if let Some(target_amount) = update.target_amount {
        require_amount("targetAmount", target_amount)?;
    }
    if let Some(current_amount) = update.current_amount {
        require_amount("currentAmount", current_amount)?;
    }

    connection
        .prepare(
            "UPDATE savings_goal
             SET name = COALESCE(?1, name),
                target_amount = COALESCE(?2, target_amount),
                current_amount = COALESCE(?3, current_amount),
                target_date = COALESCE(?4, target_date),
                description = COALESCE(?5, description)
             WHERE id = ?6 AND user_id = ?7
             RETURNING id, user_id, name, target_amount, current_amount, target_date, description, created_at",
        )?
        .query_row(
            (
                &update.name,
                update.target_amount.map(|amount| amount.to_string()),
                update.current_amount.map(|amount| amount.to_string()),
                update.target_date.map(|date| date.to_offset(UtcOffset::UTC)),
                &update.description,
                id,
                user_id.as_i64(),
            ),
            map_row_to_goal,
        )
        .map_err(Error::from)
}

/// Replace the saved amount of the savings goal `id` owned by `user_id`.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no such goal for the user, or an
/// [Error::Validation] if the amount is out of range.
pub fn set_goal_amount(
    id: DatabaseId,
    user_id: UserID,
    amount: Decimal,
    connection: &Connection,
) -> Result<SavingsGoal, Error> {
    update_goal(
        id,
        user_id,
        &SavingsGoalUpdate {
            current_amount: Some(amount),
            ..Default::default()
        },
        connection,
    )
}

/// Delete the savings goal `id` owned by `user_id`.
pub fn delete_goal(
    id: DatabaseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM savings_goal WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )
        .map_err(Error::from)
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use rusqlite::Connection;
    use rust_decimal::Decimal;

    use crate::user::UserID;

    use super::{NewSavingsGoal, SavingsGoal, create_goal};

    #[track_caller]
    pub(crate) fn must_create_goal(
        user_id: UserID,
        name: &str,
        target_amount: Decimal,
        connection: &Connection,
    ) -> SavingsGoal {
        let goal = NewSavingsGoal {
            name: name.to_owned(),
            target_amount,
            current_amount: Decimal::ZERO,
            target_date: None,
            description: None,
        };

        create_goal(user_id, &goal, connection).expect("Could not create test goal")
    }
}
