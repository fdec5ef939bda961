//! Creates the application's database schema.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, budget::create_budget_table, expense::create_expense_table, goal::create_goal_table,
    income::create_income_table, user::create_user_table,
};

/// Create the tables for every record kind if they do not already exist.
///
/// Foreign key enforcement is switched on for `connection` so that records are
/// removed along with the user that owns them.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the tables could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_income_table(&transaction)?;
    create_expense_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_goal_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
