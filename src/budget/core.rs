//! Defines the budget model and its database queries.

use rusqlite::{Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    Error,
    amount::{get_amount, require_amount},
    database_id::{DatabaseId, RowsAffected},
    error::require_text,
    period::Period,
    user::UserID,
};

/// The amount of money a user plans to spend on a category in a given month.
///
/// A user has at most one budget per category and month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// The ID of the budget.
    pub id: DatabaseId,
    /// The user that set the budget.
    pub user_id: UserID,
    /// The expense category the budget applies to.
    pub category: String,
    /// The amount of money budgeted.
    pub amount: Decimal,
    /// The month number, 1 for January through 12 for December.
    pub month: u8,
    /// The full calendar year.
    pub year: i32,
}

/// The fields needed to set a budget.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetForm {
    /// The expense category to budget for.
    pub category: String,
    /// The amount of money to budget.
    pub amount: Decimal,
    /// The month number, 1 for January through 12 for December.
    pub month: u8,
    /// The full calendar year.
    pub year: i32,
}

/// Whether setting a budget inserted a new row or changed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetChange {
    /// A new budget was inserted.
    Created,
    /// The amount of an existing budget was replaced.
    Updated,
}

pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            category TEXT NOT NULL,
            amount TEXT NOT NULL,
            month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
            year INTEGER NOT NULL,
            UNIQUE(user_id, category, month, year)
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_budget(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        category: row.get(2)?,
        amount: get_amount(row, 3)?,
        month: row.get(4)?,
        year: row.get(5)?,
    })
}

/// Set the budget for a category and month, replacing the amount of an
/// existing budget for the same category and month.
///
/// # Errors
/// Returns an [Error::Validation] if the category is blank, the amount is out
/// of range or the month is not between 1 and 12, or an [Error::SqlError] if
/// the query failed.
pub fn create_or_update_budget(
    user_id: UserID,
    form: &BudgetForm,
    connection: &Connection,
) -> Result<(Budget, BudgetChange), Error> {
    require_text("category", &form.category)?;
    require_amount("amount", form.amount)?;
    Month::try_from(form.month).map_err(|_| {
        Error::Validation(format!("month must be between 1 and 12, got {}", form.month))
    })?;

    let existing_id: Option<DatabaseId> = connection
        .query_row(
            "SELECT id FROM budget
             WHERE user_id = ?1 AND category = ?2 AND month = ?3 AND year = ?4",
            (user_id.as_i64(), &form.category, form.month, form.year),
            |row| row.get(0),
        )
        .optional()?;

    match existing_id {
        Some(id) => {
            let budget = connection
                .prepare(
                    "UPDATE budget SET amount = ?1 WHERE id = ?2
                     RETURNING id, user_id, category, amount, month, year",
                )?
                .query_row((form.amount.to_string(), id), map_row_to_budget)?;

            Ok((budget, BudgetChange::Updated))
        }
        None => {
            let budget = connection
                .prepare(
                    "INSERT INTO budget (user_id, category, amount, month, year)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     RETURNING id, user_id, category, amount, month, year",
                )?
                .query_row(
                    (
                        user_id.as_i64(),
                        &form.category,
                        form.amount.to_string(),
                        form.month,
                        form.year,
                    ),
                    map_row_to_budget,
                )?;

            Ok((budget, BudgetChange::Created))
        }
    }
}

/// Get the budgets of `user_id` for `period`, in the order they were created.
///
/// # Errors
/// Returns an [Error::SqlError] if the query failed.
pub fn get_budgets_for_period(
    user_id: UserID,
    period: &Period,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, category, amount, month, year
             FROM budget
             WHERE user_id = ?1 AND month = ?2 AND year = ?3
             ORDER BY id",
        )?
        .query_map((user_id.as_i64(), period.month, period.year), map_row_to_budget)?
        .map(|maybe_budget| maybe_budget.map_err(Error::from))
        .collect()
}

/// Delete the budget `id` owned by `user_id`.
///
/// # Errors
/// Returns an [Error::SqlError] if the delete failed.
pub fn delete_budget(
    id: DatabaseId,
    user_id: UserID,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
            (id, user_id.as_i64()),
        )
        .map_err(Error::from)
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use rusqlite::Connection;
    use rust_decimal::Decimal;

    use crate::user::UserID;

    use super::{Budget, BudgetForm, create_or_update_budget};

    #[track_caller]
    pub(crate) fn must_set_budget(
        user_id: UserID,
        category: &str,
        amount: Decimal,
        (month, year): (u8, i32),
        connection: &Connection,
    ) -> Budget {
        let form = BudgetForm {
            category: category.to_owned(),
            amount,
            month,
            year,
        };

        create_or_update_budget(user_id, &form, connection)
            .expect("Could not set test budget")
            .0
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::macros::datetime;

    use crate::{
        Error,
        period::resolve_period,
        test_utils::{must_create_test_connection, must_create_test_user, must_get_timezone},
    };

    use super::{
        BudgetChange, BudgetForm, create_or_update_budget, delete_budget, get_budgets_for_period,
        test_helpers::must_set_budget,
    };

    fn form(category: &str, amount: i64, month: u8) -> BudgetForm {
        BudgetForm {
            category: category.to_owned(),
            amount: Decimal::from(amount),
            month,
            year: 2024,
        }
    }

    #[test]
    fn first_set_creates_budget() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);

        let (budget, change) =
            create_or_update_budget(user.id, &form("Food", 200, 3), &conn).unwrap();

        assert_eq!(change, BudgetChange::Created);
        assert_eq!(budget.category, "Food");
        assert_eq!(budget.amount, Decimal::from(200));
        assert_eq!((budget.month, budget.year), (3, 2024));
    }

    #[test]
    fn second_set_updates_in_place() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);
        let (first, _) = create_or_update_budget(user.id, &form("Food", 200, 3), &conn).unwrap();

        let (second, change) =
            create_or_update_budget(user.id, &form("Food", 350, 3), &conn).unwrap();

        assert_eq!(change, BudgetChange::Updated);
        assert_eq!(second.id, first.id);
        assert_eq!(second.amount, Decimal::from(350));
        let period = resolve_period(
            Some(3),
            Some(2024),
            datetime!(2024-01-01 00:00 UTC),
            must_get_timezone("Etc/UTC"),
        )
        .unwrap();
        assert_eq!(
            get_budgets_for_period(user.id, &period, &conn).unwrap(),
            vec![second]
        );
    }

    #[test]
    fn same_category_in_other_month_is_separate() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);
        let march = must_set_budget(user.id, "Food", Decimal::TEN, (3, 2024), &conn);

        let (april, change) =
            create_or_update_budget(user.id, &form("Food", 10, 4), &conn).unwrap();

        assert_eq!(change, BudgetChange::Created);
        assert_ne!(april.id, march.id);
    }

    #[test]
    fn users_do_not_share_budgets() {
        let conn = must_create_test_connection();
        let ada = must_create_test_user("Ada", &conn);
        let bob = must_create_test_user("Bob", &conn);
        must_set_budget(ada.id, "Food", Decimal::TEN, (3, 2024), &conn);

        let (_, change) = create_or_update_budget(bob.id, &form("Food", 10, 3), &conn).unwrap();

        assert_eq!(change, BudgetChange::Created);
    }

    #[test]
    fn rejects_invalid_month_and_blank_category() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);

        assert!(matches!(
            create_or_update_budget(user.id, &form("Food", 10, 13), &conn),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            create_or_update_budget(user.id, &form("", 10, 3), &conn),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn lists_budgets_for_period_in_creation_order() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);
        let rent = must_set_budget(user.id, "Rent", Decimal::from(1500), (3, 2024), &conn);
        let food = must_set_budget(user.id, "Food", Decimal::from(200), (3, 2024), &conn);
        must_set_budget(user.id, "Food", Decimal::from(200), (4, 2024), &conn);
        let period = resolve_period(
            Some(3),
            Some(2024),
            datetime!(2024-01-01 00:00 UTC),
            must_get_timezone("Etc/UTC"),
        )
        .unwrap();

        let got = get_budgets_for_period(user.id, &period, &conn).unwrap();

        assert_eq!(got, vec![rent, food]);
    }

    #[test]
    fn delete_only_removes_own_budget() {
        let conn = must_create_test_connection();
        let ada = must_create_test_user("Ada", &conn);
        let bob = must_create_test_user("Bob", &conn);
        let budget = must_set_budget(ada.id, "Food", Decimal::TEN, (3, 2024), &conn);

        assert_eq!(delete_budget(budget.id, bob.id, &conn), Ok(0));
        assert_eq!(delete_budget(budget.id, ada.id, &conn), Ok(1));
        assert_eq!(delete_budget(budget.id, ada.id, &conn), Ok(0));
    }
}
