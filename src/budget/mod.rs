//! Monthly category budgets and how spending compares to them.

mod comparison;
mod comparison_endpoint;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;

pub use comparison::{BudgetComparison, PercentUsed, compare_budgets_to_actual};
pub use comparison_endpoint::get_budget_comparison_endpoint;
pub use core::{
    Budget, BudgetChange, BudgetForm, create_budget_table, create_or_update_budget,
    get_budgets_for_period,
};
pub use create_endpoint::create_or_update_budget_endpoint;
pub use delete_endpoint::delete_budget_endpoint;
pub use list_endpoint::list_budgets_endpoint;

#[cfg(test)]
pub(crate) use core::test_helpers::must_set_budget;
