//! Derives the overview metrics shown on the dashboard from a month of records.

use rust_decimal::Decimal;
use serde::Serialize;
use time::{OffsetDateTime, Weekday};
use time_tz::{OffsetDateTimeExt, Tz};

use crate::{
    aggregation::aggregate_by_category,
    amount::percentage,
    budget::BudgetComparison,
    expense::Expense,
    income::Income,
};

// ============================================================================
// MODELS
// ============================================================================

/// The category the user spent the most on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiggestExpense {
    /// The category, empty when there were no expenses.
    pub category: String,
    /// The total spent in the category.
    pub amount: Decimal,
}

/// Which list a transaction came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    /// Money spent.
    Expense,
    /// Money earned.
    Income,
    /// There were no transactions to pick from.
    #[serde(rename = "")]
    None,
}

/// The latest transaction across both expenses and incomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MostRecentTransaction {
    /// Whether the transaction was an expense or an income.
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// The amount of the transaction.
    pub amount: Decimal,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
}

/// Expense totals bucketed by the weekday they were made on.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct DayOfWeekExpenses {
    pub monday: Decimal,
    pub tuesday: Decimal,
    pub wednesday: Decimal,
    pub thursday: Decimal,
    pub friday: Decimal,
    pub saturday: Decimal,
    pub sunday: Decimal,
}

impl DayOfWeekExpenses {
    fn bucket_mut(&mut self, weekday: Weekday) -> &mut Decimal {
        match weekday {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
            Weekday::Sunday => &mut self.sunday,
        }
    }
}

/// The totals and highlights for one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    /// The sum of the month's incomes.
    pub total_income: Decimal,
    /// The sum of the month's expenses.
    pub total_expenses: Decimal,
    /// Income minus expenses, negative when the user spent more than they earned.
    pub savings: Decimal,
    /// Savings as a percentage of income, zero when there was no income.
    pub savings_percentage: Decimal,
    /// The sum of the month's budgets.
    pub total_budgeted: Decimal,
    /// The amount spent in budgeted categories.
    pub total_spent: Decimal,
    /// Budgeted minus spent, negative when over budget overall.
    pub total_remaining: Decimal,
    /// The category with the largest total spend.
    pub biggest_expense: BiggestExpense,
    /// The latest expense or income.
    pub most_recent_transaction: MostRecentTransaction,
    /// The month's expenses by weekday.
    pub day_of_week_expenses: DayOfWeekExpenses,
    /// Always zero, there is no historical trend data yet.
    pub monthly_spending_trend: Decimal,
    /// Always zero, recurring bills are not tracked yet.
    pub upcoming_bills: Decimal,
}

// ============================================================================
// BUILDERS
// ============================================================================

/// Build the dashboard metrics from the incomes, expenses and budget
/// comparisons of a single month.
///
/// `now` is used as the date of the most recent transaction when there are no
/// transactions. Each expense falls on the weekday of its date in `timezone`.
pub fn build_dashboard_metrics(
    incomes: &[Income],
    expenses: &[Expense],
    comparisons: &[BudgetComparison],
    now: OffsetDateTime,
    timezone: &Tz,
) -> DashboardMetrics {
    let total_income: Decimal = incomes.iter().map(|income| income.amount).sum();
    let total_expenses: Decimal = expenses.iter().map(|expense| expense.amount).sum();
    let savings = total_income - total_expenses;
    let savings_percentage = if total_income > Decimal::ZERO {
        percentage(savings, total_income).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    let total_budgeted: Decimal = comparisons.iter().map(|row| row.budgeted).sum();
    let total_spent: Decimal = comparisons.iter().map(|row| row.actual).sum();

    DashboardMetrics {
        total_income,
        total_expenses,
        savings,
        savings_percentage,
        total_budgeted,
        total_spent,
        total_remaining: total_budgeted - total_spent,
        biggest_expense: find_biggest_expense(expenses),
        most_recent_transaction: find_most_recent_transaction(incomes, expenses, now),
        day_of_week_expenses: sum_expenses_by_weekday(expenses, timezone),
        monthly_spending_trend: Decimal::ZERO,
        upcoming_bills: Decimal::ZERO,
    }
}

/// Pick the category with the largest total.
///
/// Categories are scanned in the order they first appear and only a strictly
/// larger total replaces the current pick, so ties go to the earlier category.
fn find_biggest_expense(expenses: &[Expense]) -> BiggestExpense {
    let mut biggest = BiggestExpense {
        category: String::new(),
        amount: Decimal::ZERO,
    };

    for total in aggregate_by_category(expenses).iter() {
        if total.total > biggest.amount {
            biggest = BiggestExpense {
                category: total.category.clone(),
                amount: total.total,
            };
        }
    }

    biggest
}

/// Pick the latest transaction, preferring expenses over incomes with the same date.
fn find_most_recent_transaction(
    incomes: &[Income],
    expenses: &[Expense],
    now: OffsetDateTime,
) -> MostRecentTransaction {
    let candidates = expenses
        .iter()
        .map(|expense| (TransactionKind::Expense, expense.amount, expense.date))
        .chain(
            incomes
                .iter()
                .map(|income| (TransactionKind::Income, income.amount, income.date)),
        );

    let mut latest: Option<(TransactionKind, Decimal, OffsetDateTime)> = None;
    for candidate in candidates {
        match latest {
            Some((_, _, date)) if candidate.2 <= date => {}
            _ => latest = Some(candidate),
        }
    }

    match latest {
        Some((kind, amount, date)) => MostRecentTransaction { kind, amount, date },
        None => MostRecentTransaction {
            kind: TransactionKind::None,
            amount: Decimal::ZERO,
            date: now,
        },
    }
}

fn sum_expenses_by_weekday(expenses: &[Expense], timezone: &Tz) -> DayOfWeekExpenses {
    let mut buckets = DayOfWeekExpenses::default();

    for expense in expenses {
        let weekday = expense.date.to_timezone(timezone).weekday();
        *buckets.bucket_mut(weekday) += expense.amount;
    }

    buckets
}
