//! Dashboard HTTP handlers.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;
use time::OffsetDateTime;
use time_tz::Tz;

use crate::{
    AppState, Error,
    aggregation::aggregate_by_category,
    budget::{BudgetComparison, compare_budgets_to_actual, get_budgets_for_period},
    dashboard::metrics::{DashboardMetrics, build_dashboard_metrics},
    expense::{Expense, get_expenses_in_period},
    income::{Income, get_incomes_in_period},
    period::{Period, resolve_period},
    timezone::{get_timezone, local_now},
    user::UserID,
};

/// How many of the latest expenses and incomes are included in the dashboard.
const RECENT_TRANSACTION_COUNT: usize = 5;

/// The state needed for the dashboard.
///
/// Contains the database connection and timezone information required
/// by dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Everything the overview screen shows for the current month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    /// The month the dashboard covers.
    pub period: Period,
    /// Totals and highlights for the month.
    pub metrics: DashboardMetrics,
    /// Budgeted versus actual spending for each of the month's budgets.
    pub budget_comparisons: Vec<BudgetComparison>,
    /// The latest expenses, newest first.
    pub recent_expenses: Vec<Expense>,
    /// The latest incomes, newest first.
    pub recent_incomes: Vec<Income>,
}

/// Get an overview of the requesting user's current month.
pub async fn get_dashboard_endpoint(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<DashboardResponse>, Error> {
    let timezone = get_timezone(&state.local_timezone)?;
    let now = local_now(timezone);
    let period = resolve_period(None, None, now, timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    build_dashboard(user_id, period, now, timezone, &connection).map(Json)
}

/// Read the records of `user_id` for `period` and derive the dashboard from them.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the reads failed. No partial
/// dashboard is returned.
fn build_dashboard(
    user_id: UserID,
    period: Period,
    now: OffsetDateTime,
    timezone: &Tz,
    connection: &Connection,
) -> Result<DashboardResponse, Error> {
    let incomes = get_incomes_in_period(user_id, &period, connection).inspect_err(|error| {
        tracing::error!("could not get incomes for user {user_id}: {error}")
    })?;
    let expenses = get_expenses_in_period(user_id, &period, connection).inspect_err(|error| {
        tracing::error!("could not get expenses for user {user_id}: {error}")
    })?;
    let budgets = get_budgets_for_period(user_id, &period, connection).inspect_err(|error| {
        tracing::error!("could not get budgets for user {user_id}: {error}")
    })?;

    let expense_totals = aggregate_by_category(&expenses);
    let budget_comparisons = compare_budgets_to_actual(&budgets, &expense_totals);
    let metrics = build_dashboard_metrics(&incomes, &expenses, &budget_comparisons, now, timezone);

    Ok(DashboardResponse {
        period,
        metrics,
        budget_comparisons,
        recent_expenses: expenses
            .into_iter()
            .take(RECENT_TRANSACTION_COUNT)
            .collect(),
        recent_incomes: incomes.into_iter().take(RECENT_TRANSACTION_COUNT).collect(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State};
    use rust_decimal::Decimal;
    use time::{Duration, OffsetDateTime, macros::datetime};

    use crate::{
        budget::{PercentUsed, must_set_budget},
        dashboard::metrics::TransactionKind,
        expense::must_create_expense,
        income::must_create_income,
        period::resolve_period,
        test_utils::{must_create_test_connection, must_create_test_user, must_get_timezone},
    };

    use super::{DashboardState, build_dashboard, get_dashboard_endpoint};

    #[test]
    fn builds_dashboard_for_period() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);
        let now = datetime!(2024-03-20 12:00 UTC);
        let utc = must_get_timezone("Etc/UTC");
        let period = resolve_period(None, None, now, utc).unwrap();
        must_create_income(
            user.id,
            "Salary",
            Decimal::from(4000),
            datetime!(2024-03-01 09:00 UTC),
            &conn,
        );
        must_create_expense(
            user.id,
            "Food",
            Decimal::from(50),
            datetime!(2024-03-04 09:00 UTC),
            &conn,
        );
        must_create_expense(
            user.id,
            "Food",
            Decimal::from(30),
            datetime!(2024-03-06 09:00 UTC),
            &conn,
        );
        must_create_expense(
            user.id,
            "Food",
            Decimal::from(999),
            datetime!(2024-02-28 09:00 UTC),
            &conn,
        );
        must_set_budget(user.id, "Food", Decimal::from(200), (3, 2024), &conn);

        let got = build_dashboard(user.id, period, now, utc, &conn).unwrap();

        assert_eq!(got.period, period);
        assert_eq!(got.metrics.total_income, Decimal::from(4000));
        assert_eq!(got.metrics.total_expenses, Decimal::from(80));
        assert_eq!(got.metrics.total_budgeted, Decimal::from(200));
        assert_eq!(got.metrics.total_spent, Decimal::from(80));
        assert_eq!(got.metrics.total_remaining, Decimal::from(120));
        assert_eq!(got.metrics.biggest_expense.category, "Food");
        assert_eq!(
            got.metrics.most_recent_transaction.kind,
            TransactionKind::Expense
        );
        assert_eq!(got.metrics.day_of_week_expenses.monday, Decimal::from(50));
        assert_eq!(
            got.metrics.day_of_week_expenses.wednesday,
            Decimal::from(30)
        );
        assert_eq!(got.budget_comparisons.len(), 1);
        assert_eq!(
            got.budget_comparisons[0].percent_used,
            PercentUsed::Finite(Decimal::from(40))
        );
        assert_eq!(got.recent_expenses.len(), 2);
        assert_eq!(got.recent_expenses[0].amount, Decimal::from(30));
        assert_eq!(got.recent_incomes.len(), 1);
    }

    #[test]
    fn recent_transactions_are_capped_at_five() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);
        let now = datetime!(2024-03-20 12:00 UTC);
        let utc = must_get_timezone("Etc/UTC");
        let period = resolve_period(None, None, now, utc).unwrap();
        for day in 1..=7 {
            must_create_expense(
                user.id,
                "Food",
                Decimal::from(day),
                datetime!(2024-03-01 09:00 UTC) + Duration::days(day),
                &conn,
            );
        }

        let got = build_dashboard(user.id, period, now, utc, &conn).unwrap();

        assert_eq!(got.recent_expenses.len(), 5);
        assert_eq!(got.recent_expenses[0].amount, Decimal::from(7));
        assert_eq!(got.metrics.total_expenses, Decimal::from(28));
    }

    #[test]
    fn other_users_records_are_ignored() {
        let conn = must_create_test_connection();
        let ada = must_create_test_user("Ada", &conn);
        let bob = must_create_test_user("Bob", &conn);
        let now = datetime!(2024-03-20 12:00 UTC);
        let utc = must_get_timezone("Etc/UTC");
        let period = resolve_period(None, None, now, utc).unwrap();
        must_create_expense(
            bob.id,
            "Food",
            Decimal::from(50),
            datetime!(2024-03-04 09:00 UTC),
            &conn,
        );

        let got = build_dashboard(ada.id, period, now, utc, &conn).unwrap();

        assert_eq!(got.metrics.total_expenses, Decimal::ZERO);
        assert!(got.recent_expenses.is_empty());
    }

    #[tokio::test]
    async fn endpoint_uses_current_month() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);
        let today = OffsetDateTime::now_utc();
        must_create_income(user.id, "Salary", Decimal::from(100), today, &conn);
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        };

        let got = get_dashboard_endpoint(State(state), Extension(user.id))
            .await
            .unwrap();

        assert_eq!(got.0.period.month, u8::from(today.month()));
        assert_eq!(got.0.period.year, today.year());
        assert_eq!(got.0.metrics.total_income, Decimal::from(100));
        assert_eq!(got.0.metrics.savings_percentage, Decimal::from(100));
    }

    #[tokio::test]
    async fn endpoint_rejects_invalid_timezone() {
        let conn = must_create_test_connection();
        let user = must_create_test_user("Ada", &conn);
        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Not/AZone".to_owned(),
        };

        let result = get_dashboard_endpoint(State(state), Extension(user.id)).await;

        assert!(result.is_err());
    }
}
