//! Compares what a user budgeted for each category against what they spent.

use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::{
    Error,
    aggregation::{CategoryTotals, aggregate_by_category},
    amount::percentage,
    budget::{Budget, get_budgets_for_period},
    expense::get_expenses_in_period,
    period::Period,
    user::UserID,
};

/// How much of a budget has been spent, as a percentage.
///
/// Spending against a zero budget has no finite percentage and is reported as
/// [PercentUsed::Unbounded], which orders above every finite percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PercentUsed {
    /// A percentage, e.g. 40 for 40%.
    Finite(Decimal),
    /// Money was spent against a budget of zero.
    Unbounded,
}

impl PercentUsed {
    /// The percentage of `budgeted` used by `actual`.
    pub fn of(actual: Decimal, budgeted: Decimal) -> Self {
        if budgeted.is_zero() {
            return if actual > Decimal::ZERO {
                PercentUsed::Unbounded
            } else {
                PercentUsed::Finite(Decimal::ZERO)
            };
        }

        percentage(actual, budgeted).map_or(PercentUsed::Unbounded, PercentUsed::Finite)
    }
}

impl Serialize for PercentUsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PercentUsed::Finite(percent) => Serialize::serialize(percent, serializer),
            PercentUsed::Unbounded => serializer.serialize_str("unbounded"),
        }
    }
}

/// Budgeted versus actual spending for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetComparison {
    /// The budgeted category.
    pub category: String,
    /// The amount budgeted.
    pub budgeted: Decimal,
    /// The amount spent in the category during the budget's month.
    pub actual: Decimal,
    /// Budgeted minus actual, negative when overspent.
    pub remaining: Decimal,
    /// How much of the budget has been used.
    pub percent_used: PercentUsed,
}

/// Produce one comparison per budget, in the order of `budgets`.
///
/// Categories with expenses but no budget are left out.
pub fn compare_budgets_to_actual(
    budgets: &[Budget],
    expense_totals: &CategoryTotals,
) -> Vec<BudgetComparison> {
    budgets
        .iter()
        .map(|budget| {
            let actual = expense_totals
                .get(&budget.category)
                .unwrap_or(Decimal::ZERO);

            BudgetComparison {
                category: budget.category.clone(),
                budgeted: budget.amount,
                actual,
                remaining: budget.amount - actual,
                percent_used: PercentUsed::of(actual, budget.amount),
            }
        })
        .collect()
}

/// Read the budgets and expenses of `user_id` for `period` and compare them.
///
/// # Errors
/// Returns an [Error::SqlError] if either read failed.
pub fn get_budget_comparisons(
    user_id: UserID,
    period: &Period,
    connection: &Connection,
) -> Result<Vec<BudgetComparison>, Error> {
    let budgets = get_budgets_for_period(user_id, period, connection)?;
    let expenses = get_expenses_in_period(user_id, period, connection)?;

    Ok(compare_budgets_to_actual(
        &budgets,
        &aggregate_by_category(&expenses),
    ))
}
