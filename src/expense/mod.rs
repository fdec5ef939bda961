//! Recording, listing, editing and summarizing expenses.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod summary_endpoint;

pub use core::{
    Expense, ExpenseFilter, ExpenseUpdate, NewExpense, create_expense, create_expense_table,
    get_expenses, get_expenses_in_period,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use list_endpoint::{get_expense_endpoint, list_expenses_endpoint};
pub use summary_endpoint::get_expense_summary_endpoint;

#[cfg(test)]
pub(crate) use core::test_helpers::must_create_expense;
