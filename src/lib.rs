//! A REST API for tracking personal income, expenses, budgets and savings goals.
//!
//! Users record what they earn and spend, set monthly budgets per expense
//! category, and get back how their spending compares to those budgets along
//! with an overview of the current month.
//!
//! Every `/api` route acts on behalf of the user named in the `X-User-Id`
//! header. Amounts are exact decimals and are sent as JSON strings.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod aggregation;
mod alert;
mod amount;
mod app_state;
mod budget;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod error;
mod expense;
mod goal;
mod identity;
mod income;
mod logging;
mod period;
mod routing;
mod timezone;
mod user;

#[cfg(test)]
mod test_utils;

pub use aggregation::{CategoryTotal, CategoryTotals, Categorized, aggregate_by_category};
pub use app_state::AppState;
pub use budget::{
    Budget, BudgetChange, BudgetComparison, BudgetForm, PercentUsed, compare_budgets_to_actual,
    create_or_update_budget,
};
pub use category::Frequency;
pub use dashboard::{DashboardMetrics, build_dashboard_metrics};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use expense::{Expense, NewExpense, create_expense};
pub use goal::{NewSavingsGoal, SavingsGoal, create_goal};
pub use identity::USER_ID_HEADER;
pub use income::{Income, NewIncome, create_income};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use period::{Period, resolve_period};
pub use routing::build_router;
pub use user::{User, UserID, create_user, get_user_by_id};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
