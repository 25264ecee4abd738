//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState, endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, download_expenses_endpoint,
        get_edit_expense_page, get_expenses_view, get_filtered_expenses_page,
        update_expense_endpoint,
    },
    expense_type::{
        create_expense_type_endpoint, delete_expense_type_endpoint, get_expense_types_page,
    },
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::EXPENSES_VIEW, get(get_expenses_view))
        .route(
            endpoints::FILTERED_EXPENSES_VIEW,
            get(get_filtered_expenses_page),
        )
        .route(endpoints::ADD_EXPENSE, post(create_expense_endpoint))
        .route(endpoints::EDIT_EXPENSE_VIEW, get(get_edit_expense_page))
        .route(endpoints::UPDATE_EXPENSE, post(update_expense_endpoint))
        .route(endpoints::DELETE_EXPENSE, post(delete_expense_endpoint))
        .route(
            endpoints::EXPENSE_TYPES_VIEW,
            get(get_expense_types_page).post(create_expense_type_endpoint),
        )
        .route(
            endpoints::DELETE_EXPENSE_TYPE,
            post(delete_expense_type_endpoint),
        )
        .route(endpoints::DOWNLOAD_EXPENSES, get(download_expenses_endpoint))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the expenses page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::EXPENSES_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde::Serialize;

    use crate::{AppState, endpoints, pagination::PaginationConfig};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection, PaginationConfig::default())
            .expect("Could not create app state");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[derive(Serialize)]
    struct NewExpenseType<'a> {
        name: &'a str,
    }

    #[derive(Serialize)]
    struct NewExpense<'a> {
        amount: &'a str,
        date: &'a str,
        expense_type_id: &'a str,
        description: &'a str,
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let server = get_test_server();

        server
            .get("/does/not/exist")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn pages_are_routed() {
        let server = get_test_server();

        server.get(endpoints::EXPENSES_VIEW).await.assert_status_ok();
        server
            .get(endpoints::FILTERED_EXPENSES_VIEW)
            .add_query_param("year", 2024)
            .add_query_param("month", "March")
            .await
            .assert_status_ok();
        server
            .get(endpoints::EXPENSE_TYPES_VIEW)
            .await
            .assert_status_ok();
        server
            .get(endpoints::DOWNLOAD_EXPENSES)
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn record_and_export_an_expense() {
        let server = get_test_server();

        server
            .post(endpoints::EXPENSE_TYPES_VIEW)
            .form(&NewExpenseType { name: "Food" })
            .await
            .assert_status_see_other();

        server
            .post(endpoints::ADD_EXPENSE)
            .form(&NewExpense {
                amount: "10.50",
                date: "2024-03-15",
                expense_type_id: "1",
                description: "Lunch",
            })
            .await
            .assert_status_see_other();

        let response = server.get(endpoints::DOWNLOAD_EXPENSES).await;

        response.assert_status_ok();
        response.assert_text(
            "id,amount,date,expense_type,description\n1,10.50,2024-03-15,Food,Lunch\n",
        );
    }

    #[tokio::test]
    async fn serves_stylesheet_linked_by_pages() {
        let server = get_test_server();

        let response = server.get("/static/main.css").await;

        response.assert_status_ok();
        assert!(
            response
                .header("content-type")
                .to_str()
                .unwrap()
                .starts_with("text/css")
        );
    }

    #[tokio::test]
    async fn amount_too_large_is_rejected_and_list_still_renders() {
        let server = get_test_server();
        server
            .post(endpoints::EXPENSE_TYPES_VIEW)
            .form(&NewExpenseType { name: "Food" })
            .await
            .assert_status_see_other();

        for _ in 0..2 {
            let response = server
                .post(endpoints::ADD_EXPENSE)
                .form(&NewExpense {
                    amount: "79228162514264337593543950335",
                    date: "2024-03-15",
                    expense_type_id: "1",
                    description: "Everything",
                })
                .await;

            response.assert_status_ok();
            assert!(
                response
                    .text()
                    .contains("Amount cannot be more than $1,000,000,000.00")
            );
        }

        server.get(endpoints::EXPENSES_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn edit_page_for_missing_expense_returns_404() {
        let server = get_test_server();

        server
            .get(&endpoints::format_endpoint(endpoints::EDIT_EXPENSE_VIEW, 1))
            .await
            .assert_status_not_found();
    }
}
