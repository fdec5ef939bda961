//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, patch},
};

use crate::{
    AppState, Error,
    budget::{
        create_or_update_budget_endpoint, delete_budget_endpoint, get_budget_comparison_endpoint,
        list_budgets_endpoint,
    },
    category::get_categories_endpoint,
    dashboard::get_dashboard_endpoint,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, edit_expense_endpoint,
        get_expense_endpoint, get_expense_summary_endpoint, list_expenses_endpoint,
    },
    goal::{
        create_goal_endpoint, delete_goal_endpoint, edit_goal_endpoint, get_goal_endpoint,
        list_goals_endpoint, update_goal_amount_endpoint,
    },
    identity::identity_guard,
    income::{
        create_income_endpoint, delete_income_endpoint, edit_income_endpoint, get_income_endpoint,
        list_incomes_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_health_check))
        .route(endpoints::CATEGORIES, get(get_categories_endpoint));

    let protected_routes = Router::new()
        .route(
            endpoints::INCOMES,
            get(list_incomes_endpoint).post(create_income_endpoint),
        )
        .route(
            endpoints::INCOME,
            get(get_income_endpoint)
                .put(edit_income_endpoint)
                .delete(delete_income_endpoint),
        )
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE_SUMMARY,
            get(get_expense_summary_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .put(edit_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .route(
            endpoints::BUDGETS,
            get(list_budgets_endpoint).post(create_or_update_budget_endpoint),
        )
        .route(
            endpoints::BUDGET_COMPARISON,
            get(get_budget_comparison_endpoint),
        )
        .route(endpoints::BUDGET, delete(delete_budget_endpoint))
        .route(
            endpoints::GOALS,
            get(list_goals_endpoint).post(create_goal_endpoint),
        )
        .route(
            endpoints::GOAL,
            get(get_goal_endpoint)
                .put(edit_goal_endpoint)
                .delete(delete_goal_endpoint),
        )
        .route(endpoints::GOAL_AMOUNT, patch(update_goal_amount_endpoint))
        .route(endpoints::DASHBOARD, get(get_dashboard_endpoint))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            identity_guard,
        ));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Let clients and load balancers know the server is up.
async fn get_health_check() -> &'static str {
    "Budget API is running"
}

async fn get_404_not_found() -> Response {
    Error::NotFound.into_response()
}

#[cfg(test)]
mod router_tests {
    use axum::http::{HeaderName, HeaderValue, StatusCode};
    use axum_test::{TestRequest, TestServer};
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState,
        endpoints::{self, format_endpoint},
        identity::USER_ID_HEADER,
        user::{UserID, create_user},
    };

    use super::build_router;

    fn get_test_server() -> (TestServer, UserID) {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection, "Etc/UTC").expect("Could not create app state");
        let user = create_user(
            "Ada",
            &state
                .db_connection
                .lock()
                .expect("Could not acquire database connection"),
        )
        .expect("Could not create test user");

        (
            TestServer::new(build_router(state)).expect("Could not create test server."),
            user.id,
        )
    }

    fn as_user(request: TestRequest, user_id: UserID) -> TestRequest {
        request.add_header(
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from(user_id.as_i64()),
        )
    }

    #[tokio::test]
    async fn root_reports_server_is_running() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        assert_eq!(response.text(), "Budget API is running");
    }

    #[tokio::test]
    async fn categories_do_not_need_a_user() {
        let (server, _) = get_test_server();

        let response = server.get(endpoints::CATEGORIES).await;

        response.assert_status_ok();
        assert!(response.json::<Value>()["expenseCategories"].is_array());
    }

    #[tokio::test]
    async fn api_routes_require_a_user() {
        let (server, _) = get_test_server();

        for endpoint in [
            endpoints::DASHBOARD,
            endpoints::BUDGETS,
            endpoints::EXPENSES,
            endpoints::INCOMES,
            endpoints::GOALS,
        ] {
            let response = server.get(endpoint).await;

            response.assert_status(StatusCode::UNAUTHORIZED);
            assert_eq!(
                response.json::<Value>(),
                json!({"message": "Not authorized"})
            );
        }
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (server, _) = get_test_server();

        server
            .get("/api/nothing-here")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn budget_comparison_flow() {
        let (server, user_id) = get_test_server();
        let budget = json!({"category": "Food", "amount": "150", "month": 3, "year": 2024});

        as_user(server.post(endpoints::BUDGETS), user_id)
            .json(&budget)
            .await
            .assert_status(StatusCode::CREATED);
        let budget = json!({"category": "Food", "amount": "200", "month": 3, "year": 2024});
        as_user(server.post(endpoints::BUDGETS), user_id)
            .json(&budget)
            .await
            .assert_status_ok();
        for (amount, date) in [("50", "2024-03-04T09:00:00Z"), ("30", "2024-03-06T09:00:00Z")] {
            as_user(server.post(endpoints::EXPENSES), user_id)
                .json(&json!({"category": "Food", "amount": amount, "date": date}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = as_user(server.get(endpoints::BUDGET_COMPARISON), user_id)
            .add_query_param("month", 3)
            .add_query_param("year", 2024)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!([{
                "category": "Food",
                "budgeted": "200",
                "actual": "80",
                "remaining": "120",
                "percentUsed": "40",
            }])
        );
    }

    #[tokio::test]
    async fn expense_summary_is_not_mistaken_for_an_expense_id() {
        let (server, user_id) = get_test_server();
        as_user(server.post(endpoints::EXPENSES), user_id)
            .json(&json!({"category": "Rent", "amount": "900", "date": "2024-02-01T00:00:00Z"}))
            .await
            .assert_status(StatusCode::CREATED);

        let response = as_user(server.get(endpoints::EXPENSE_SUMMARY), user_id)
            .add_query_param("month", 2)
            .add_query_param("year", 2024)
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<Value>(),
            json!([{"category": "Rent", "total": "900"}])
        );
    }

    #[tokio::test]
    async fn out_of_range_month_matches_no_budgets() {
        let (server, user_id) = get_test_server();
        as_user(server.post(endpoints::BUDGETS), user_id)
            .json(&json!({"category": "Food", "amount": "200", "month": 1, "year": 2025}))
            .await
            .assert_status(StatusCode::CREATED);

        let response = as_user(server.get(endpoints::BUDGET_COMPARISON), user_id)
            .add_query_param("month", 13)
            .add_query_param("year", 2024)
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!([]));
    }

    #[tokio::test]
    async fn blank_month_and_year_default_to_current_month() {
        let (server, user_id) = get_test_server();

        let response = as_user(server.get(endpoints::EXPENSE_SUMMARY), user_id)
            .add_query_param("month", "")
            .add_query_param("year", "")
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<Value>(), json!([]));
    }

    #[tokio::test]
    async fn malformed_month_is_bad_request() {
        let (server, user_id) = get_test_server();

        as_user(server.get(endpoints::BUDGETS), user_id)
            .add_query_param("month", "March")
            .add_query_param("year", 2024)
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_missing_budget_is_not_found() {
        let (server, user_id) = get_test_server();

        as_user(server.delete(&format_endpoint(endpoints::BUDGET, 42)), user_id)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn goal_amount_can_be_patched() {
        let (server, user_id) = get_test_server();
        let goal = as_user(server.post(endpoints::GOALS), user_id)
            .json(&json!({"name": "Holiday", "targetAmount": "1000"}))
            .await
            .json::<Value>();
        let goal_id = goal["id"].as_i64().expect("goal should have an integer id");

        let response = as_user(
            server.patch(&format_endpoint(endpoints::GOAL_AMOUNT, goal_id)),
            user_id,
        )
        .json(&json!({"amount": "1000"}))
        .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["currentAmount"], json!("1000"));
        assert_eq!(body["isGoalReached"], json!(true));
    }

    #[tokio::test]
    async fn dashboard_returns_metrics_for_current_month() {
        let (server, user_id) = get_test_server();

        let response = as_user(server.get(endpoints::DASHBOARD), user_id).await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["metrics"]["totalIncome"], json!("0"));
        assert_eq!(body["metrics"]["savingsPercentage"], json!("0"));
        assert_eq!(
            body["metrics"]["biggestExpense"],
            json!({"category": "", "amount": "0"})
        );
        assert_eq!(body["budgetComparisons"], json!([]));
        assert_eq!(body["recentExpenses"], json!([]));
    }
}
