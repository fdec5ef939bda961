//! Dashboard module
//!
//! Provides an overview of the current month: income and expense totals,
//! budget usage, the biggest expense category, the most recent transaction
//! and a breakdown of spending by weekday.

mod handlers;
mod metrics;

pub use handlers::get_dashboard_endpoint;
pub use metrics::{DashboardMetrics, build_dashboard_metrics};
