//! Defines the expense model and its database queries.

use rusqlite::{Connection, Row, named_params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    aggregation::Categorized,
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

/// Money the user spent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: DatabaseId,
    /// The user that recorded the expense.
    pub user_id: UserID,
    /// What the money was spent on, e.g. "Food".
    pub category: String,
    /// The amount of money spent.
    pub amount: Decimal,
    /// When the money was spent.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Whether the expense repeats.
    pub is_recurring: bool,
    /// How often the expense repeats.
    pub frequency: Option<Frequency>,
    /// Free text notes.
    pub description: Option<String>,
    /// How the expense was paid, e.g. "Credit Card".
    pub payment_method: Option<String>,
}

impl Categorized for Expense {
    fn category(&self) -> &str {
        &self.category
    }

    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// The fields needed to record a new expense.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    /// What the money was spent on, must not be blank.
    pub category: String,
    /// The amount of money spent.
    pub amount: Decimal,
    /// When the money was spent.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Defaults to `false`.
    #[serde(default)]
    pub is_recurring: bool,
    /// How often the expense repeats, if it does.
    #[serde(default)]
    pub frequency: Option<Frequency>,
    /// Free text notes.
    #[serde(default)]
    pub description: Option<String>,
    /// How the expense was paid.
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// A partial update to an expense.
///
/// Fields that are `None` keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpenseUpdate {
    /// The new category, must not be blank.
    pub category: Option<String>,
    /// The new amount.
    pub amount: Option<Decimal>,
    /// The new date of the expense.
    #[serde(with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    /// Whether it repeats.
    pub is_recurring: Option<bool>,
    /// How often it repeats.
    pub frequency: Option<Frequency>,
    /// Free text notes.
    pub description: Option<String>,
    /// How it was paid.
    pub payment_method: Option<String>,
}

/// Narrows down which expenses are listed.
///
/// The date bounds are inclusive. `None` leaves that side of the filter open.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExpenseFilter {
    /// The earliest date to list.
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_date: Option<OffsetDateTime>,
    /// The latest date to list.
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    /// Only list expenses with exactly this category.
    pub category: Option<String>,
}

impl ExpenseFilter {
    /// A filter matching every expense in `period`.
    pub fn for_period(period: &Period) -> Self {
        let range = period.utc_range();

        Self {
            start_date: Some(*range.start()),
            end_date: Some(*range.end()),
            category: None,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            category TEXT NOT NULL,
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            is_recurring INTEGER NOT NULL DEFAULT 0,
            frequency TEXT,
            description TEXT,
            payment_method TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_expense_user_date ON expense(user_id, date);",
    )?;

    Ok(())
}

pub fn map_row_to_expense(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category: row.get(2)?,
        amount: get_amount(row, 3)?,
        date: row.get(4)?,
        is_recurring: row.get(5)?,
        frequency: get_optional_frequency(row, 6)?,
        description: row.get(7)?,
        payment_method: row.get(8)?,
    })
}

/// Record a new expense for `user_id`.
///
/// # Errors
/// Returns an [Error::Validation] if the category is blank or the amount is
/// out of range, or an
/// [Error::SqlError] if the insert failed.
pub fn create_expense(
    user_id: UserID,
    expense: &NewExpense,
    connection: &Connection,
) -> Result<Expense, Error> {
    require_text("category", &expense.category)?;
    require_amount("amount", expense.amount)?;

    let expense = connection
        .prepare(
            "INSERT INTO expense
                (user_id, category, amount, date, is_recurring, frequency, description, payment_method)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING id, user_id, category, amount, date, is_recurring, frequency, description, payment_method",
        )?
        .query_row(
            (
                user_id.as_i64(),
                &expense.category,
                expense.amount.to_string(),
                expense.date.to_offset(UtcOffset::UTC),
                expense.is_recurring,
                expense.frequency.map(|frequency| frequency.as_str()),
                &expense.description,
                &expense.payment_method,
            ),
            map_row_to_expense,
        )?;

    Ok(expense)
}

/// Get the expense `id` owned by `user_id`.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no such expense or it belongs to
/// another user.
pub fn get_expense(
    id: DatabaseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, amount, date, is_recurring, frequency, description, payment_method
             FROM expense
             WHERE id = ?1 AND user_id = ?2",
        )?
        .query_row((id, user_id.as_i64()), map_row_to_expense)
        .map_err(Error::from)
}

/// Get the expenses of `user_id` that match `filter`, most recent first.
///
/// # Errors
/// Returns an [Error::SqlError] if the query failed.
pub fn get_expenses(
    user_id: UserID,
    filter: &ExpenseFilter,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, amount, date, is_recurring, frequency, description, payment_method
             FROM expense
             WHERE user_id = :user_id
                AND (:start_date IS NULL OR date >= :start_date)
                AND (:end_date IS NULL OR date <= :end_date)
                AND (:category IS NULL OR category = :category)
             ORDER BY date DESC, id DESC",
        )?
        .query_map(
            named_params! {
                ":user_id": user_id.as_i64(),
                ":start_date": filter.start_date.map(|date| date.to_offset(UtcOffset::UTC)),
                ":end_date": filter.end_date.map(|date| date.to_offset(UtcOffset::UTC)),
                ":category": filter.category,
            },
            map_row_to_expense,
        )?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

/// Get the expenses of `user_id` that fall within `period`, most recent first.
///
/// # Errors
/// Returns an [Error::SqlError] if the query failed.
pub fn get_expenses_in_period(
    user_id: UserID,
    period: &Period,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    get_expenses(user_id, &ExpenseFilter::for_period(period), connection)
}

/// Apply `update` to the expense `id` owned by `user_id`.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no such expense or it belongs to
/// another user, or an [Error::Validation] if the new category is blank.
pub fn update_expense(
    id: DatabaseId,
    user_id: UserID,
    update: &ExpenseUpdate,
    connection: &Connection,
) -> Result<Expense, Error> {
    if let Some(category) = &update.category {
        require_text("category", category)?;
    }

    if let Some(amount) = update.amount {
        require_amount("amount", amount)?;
    }

    connection
        .prepare(
            "UPDATE expense
             SET category = COALESCE(?1, category),
                amount = COALESCE(?2, amount),
                date = COALESCE(?3, date),
                is_recurring = COALESCE(?4, is_recurring),
                frequency = COALESCE(?5, frequency),
                description = COALESCE(?6, description),
                payment_method = COALESCE(?7, payment_method)
             WHERE id = ?8 AND user_id = ?9
             RETURNING id, user_id, category, amount, date, is_recurring, frequency, description, payment_method",
        )?
        .query_row(
            (
                &update.category,
                update.amount.map(|amount| amount.to_string()),
                update.date.map(|date| date.to_offset(UtcOffset::UTC)),
                update.is_recurring,
                update.frequency.map(|frequency| frequency.as_str()),
                &update.description,
                &update.payment_method,
                id,
                user_id.as_i64(),
            ),
            map_row_to_expense,
        )
        .map_err(Error::from)
}

/// Delete the expense `id` owned by `user_id`.
///
/// Returns the number of deleted rows, zero if there was no such expense.
///
/// # Errors
/// Returns an [Error::SqlError] if the delete failed.
pub fn delete_expense(
    id: DatabaseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )
        .map_err(Error::from)
}
