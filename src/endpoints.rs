//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/budgets/{budget_id}', use [format_endpoint].

/// The root route, which reports that the server is up.
pub const ROOT: &str = "/";
/// The route for the suggested expense categories, payment methods and frequencies.
pub const CATEGORIES: &str = "/api/categories";
/// The route to list and record incomes.
pub const INCOMES: &str = "/api/income";
/// The route to access a single income.
pub const INCOME: &str = "/api/income/{income_id}";
/// The route to list and record expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route to access a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route for a month's expense totals by category.
pub const EXPENSE_SUMMARY: &str = "/api/expenses/summary";
/// The route to list and set budgets.
pub const BUDGETS: &str = "/api/budgets";
/// The route to delete a budget.
pub const BUDGET: &str = "/api/budgets/{budget_id}";
/// The route for comparing a month's budgets to actual spending.
pub const BUDGET_COMPARISON: &str = "/api/budgets/comparison";
/// The route to list and create savings goals.
pub const GOALS: &str = "/api/goals";
/// The route to access a single savings goal.
pub const GOAL: &str = "/api/goals/{goal_id}";
/// The route to set how much has been saved towards a goal.
pub const GOAL_AMOUNT: &str = "/api/goals/{goal_id}/amount";
/// The route for the current month's overview.
pub const DASHBOARD: &str = "/api/dashboard";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter starts with a left brace and ends with a right brace, e.g.
/// '{budget_id}' in '/api/budgets/{budget_id}'. Only the first parameter is
/// replaced.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |offset| param_start + offset + 1);

    format!(
        "{}{id}{}",
        &endpoint_path[..param_start],
        &endpoint_path[param_end..]
    )
}
