//! Defines the income model and its database queries.

use rusqlite::{Connection, Row, named_params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    amount::{get_amount, require_amount},
    category::{Frequency, get_optional_frequency},
    database_id::{DatabaseId, RowsAffected},
    error::require_text,
    period::Period,
    user::UserID,
};

// ============================================================================
// MODELS
// ============================================================================

/// Money the user earned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    /// The ID of the income.
    pub id: DatabaseId,
    /// The user that recorded the income.
    pub user_id: UserID,
    /// Where the money came from, e.g. "Salary".
    pub source: String,
    /// The amount of money earned.
    pub amount: Decimal,
    /// When the money was received.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Whether the income repeats.
    pub is_recurring: bool,
    /// How often the income repeats.
    pub frequency: Option<Frequency>,
    /// Free text notes.
    pub description: Option<String>,
}

/// The fields needed to record a new income.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncome {
    /// Where the money came from, must not be blank.
    pub source: String,
    /// The amount of money earned.
    pub amount: Decimal,
    /// When the money was received.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Defaults to `false`.
    #[serde(default)]
    pub is_recurring: bool,
    /// How often the income repeats, if it does.
    #[serde(default)]
    pub frequency: Option<Frequency>,
    /// Free text notes.
    #[serde(default)]
    pub description: Option<String>,
}

/// A partial update to an income.
///
/// Fields that are `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomeUpdate {
    /// The new source, must not be blank.
    pub source: Option<String>,
    /// The new amount.
    pub amount: Option<Decimal>,
    /// The new date of the income.
    #[serde(with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    /// Whether it repeats.
    pub is_recurring: Option<bool>,
    /// How often it repeats.
    pub frequency: Option<Frequency>,
    /// Free text notes.
    pub description: Option<String>,
}

/// Narrows down which incomes are listed.
///
/// The date bounds are inclusive. `None` leaves that side of the filter open.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IncomeFilter {
    /// The earliest date to list.
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_date: Option<OffsetDateTime>,
    /// The latest date to list.
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
}

impl IncomeFilter {
    /// A filter matching every income in `period`.
    pub fn for_period(period: &Period) -> Self {
        let range = period.utc_range();

        Self {
            start_date: Some(*range.start()),
            end_date: Some(*range.end()),
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

pub fn create_income_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS income (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            source TEXT NOT NULL,
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            is_recurring INTEGER NOT NULL DEFAULT 0,
            frequency TEXT,
            description TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_income_user_date ON income(user_id, date);",
    )?;

    Ok(())
}

pub fn map_row_to_income(row: &Row) -> Result<Income, rusqlite::Error> {
    Ok(Income {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        source: row.get(2)?,
        amount: get_amount(row, 3)?,
        date: row.get(4)?,
        is_recurring: row.get(5)?,
        frequency: get_optional_frequency(row, 6)?,
        description: row.get(7)?,
    })
}

/// Record a new income for `user_id`.
///
/// # Errors
/// Returns an [Error::Validation] if the source is blank or the amount is
/// out of range, or an
/// [Error::SqlError] if the insert failed.
pub fn create_income(
    user_id: UserID,
    income: &NewIncome,
    connection: &Connection,
) -> Result<Income, Error> {
    require_text("source", &income.source)?;
    require_amount("amount", income.amount)?;

    let income = connection
        .prepare(
            "INSERT INTO income
                (user_id, source, amount, date, is_recurring, frequency, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, user_id, source, amount, date, is_recurring, frequency, description",
        )?
        .query_row(
            (
                user_id.as_i64(),
                &income.source,
                income.amount.to_string(),
                income.date.to_offset(UtcOffset::UTC),
                income.is_recurring,
                income.frequency.map(|frequency| frequency.as_str()),
                &income.description,
            ),
            map_row_to_income,
        )?;

    Ok(income)
}

/// Get the income `id` owned by `user_id`.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no such income or it belongs to
/// another user.
pub fn get_income(
    id: DatabaseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Income, Error> {
    connection
        .prepare(
            "SELECT id, user_id, source, amount, date, is_recurring, frequency, description
             FROM income
             WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row((id, user_id.as_i64()), map_row_to_income)
        .map_err(Error::from)
}

/// Get the incomes of `user_id` that match `filter`, most recent first.
///
/// # Errors
/// Returns an [Error::SqlError] if the query failed.
pub fn get_incomes(
    user_id: UserID,
    filter: &IncomeFilter,
    connection: &Connection,
) -> Result<Vec<Income>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, source, amount, date, is_recurring, frequency, description
             FROM income
             WHERE user_id = :user_id
                AND (:start_date IS NULL OR date >= :start_date)
                AND (:end_date IS NULL OR date <= :end_date)
             ORDER BY date DESC, id DESC",
        )?
        .query_map(
            named_params! {
                ":user_id": user_id.as_i64(),
                ":start_date": filter.start_date.map(|date| date.to_offset(UtcOffset::UTC)),
                ":end_date": filter.end_date.map(|date| date.to_offset(UtcOffset::UTC)),
            },
            map_row_to_income,
        )?
        .map(|maybe_income| maybe_income.map_err(Error::from))
        .collect()
}

/// Get the incomes of `user_id` that fall within `period`, most recent first.
///
/// # Errors
/// Returns an [Error::SqlError] if the query failed.
pub fn get_incomes_in_period(
    user_id: UserID,
    period: &Period,
    connection: &Connection,
) -> Result<Vec<Income>, Error> {
    get_incomes(user_id, &IncomeFilter::for_period(period), connection)
}

/// Apply `update` to the income `id` owned by `user_id`.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no such income or it belongs to
/// another user, or an [Error::Validation] if the new source is blank.
pub fn update_income(
    id: DatabaseId,
    user_id: UserID,
    update: &IncomeUpdate,
    connection: &Connection,
) -> Result<Income, Error> {
    if let Some(source) = &update.source {
        require_text("source", source)?;
    }

    if let Some(amount) = update.amount {
        require_amount("amount", amount)?;
    }

    connection
        .prepare(
            "UPDATE income
             SET source = COALESCE(?1, source),
                amount = COALESCE(?2, amount),
                date = COALESCE(?3, date),
                is_recurring = COALESCE(?4, is_recurring),
                frequency = COALESCE(?5, frequency),
                description = COALESCE(?6, description)
             WHERE id = ?7 AND user_id = ?8
             RETURNING id, user_id, source, amount, date, is_recurring, frequency, description",
        )?
        .query_row(
            (
                &update.source,
                update.amount.map(|amount| amount.to_string()),
                update.date.map(|date| date.to_offset(UtcOffset::UTC)),
                update.is_recurring,
                update.frequency.map(|frequency| frequency.as_str()),
                &update.description,
                id,
                user_id.as_i64(),
            ),
            map_row_to_income,
        )
        .map_err(Error::from)
}

/// Delete the income `id` owned by `user_id`.
///
/// Returns the number of deleted rows, zero if there was no such income.
///
/// # Errors
/// Returns an [Error::SqlError] if the delete failed.
pub fn delete_income(
    id: DatabaseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM income WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )
        .map_err(Error::from)
}
