//! Expense type deletion endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    Error, endpoints,
    expense_type::{
        ExpenseTypeId,
        db::delete_expense_type,
        domain::ExpenseTypeForm,
        page::{ExpenseTypesPageState, PageMessages, render_expense_types_page},
    },
};

/// Handle expense type deletion.
///
/// Redirects to the expense types page on success. An expense type that is
/// still used by expenses is kept and the page is shown again with a
/// "409 Conflict" status and an explanation.
pub async fn delete_expense_type_endpoint(
    Path(expense_type_id): Path<ExpenseTypeId>,
    State(state): State<ExpenseTypesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_expense_type(expense_type_id, &connection) {
        Ok(()) => {
            tracing::info!("deleted expense type {expense_type_id}");
            Ok(Redirect::to(endpoints::EXPENSE_TYPES_VIEW).into_response())
        }
        Err(Error::ExpenseTypeInUse(name)) => {
            tracing::warn!("refused to delete expense type {expense_type_id}, it is still in use");
            let message = format!(
                "Cannot delete \"{name}\" because it is used by one or more expenses. \
                Delete or change those expenses first."
            );
            let messages = PageMessages {
                name_error: None,
                alert: Some(&message),
            };
            let page =
                render_expense_types_page(&connection, &ExpenseTypeForm::default(), messages)?;

            Ok((StatusCode::CONFLICT, page).into_response())
        }
        Err(error @ Error::DeleteMissingExpenseType) => {
            tracing::debug!("tried to delete missing expense type {expense_type_id}");
            Err(error)
        }
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while deleting expense type {expense_type_id}: {error}"
            );
            Err(error)
        }
    }
}

#[cfg(test)]
mod delete_expense_type_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error, endpoints,
        expense::{ExpenseDraft, save_expense},
        expense_type::{ExpenseTypeName, create_expense_type, get_expense_type},
        test_utils::{
            assert_redirect, assert_valid_html, get_test_connection, parse_html_document,
            select_text,
        },
    };

    use super::{ExpenseTypesPageState, delete_expense_type_endpoint};

    fn get_state() -> ExpenseTypesPageState {
        ExpenseTypesPageState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        }
    }

    #[tokio::test]
    async fn delete_expense_type_succeeds() {
        let state = get_state();
        let expense_type = create_expense_type(
            ExpenseTypeName::new_unchecked("Food"),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = delete_expense_type_endpoint(Path(expense_type.id), State(state.clone()))
            .await
            .unwrap();

        assert_redirect(&response, endpoints::EXPENSE_TYPES_VIEW);
        assert_eq!(
            get_expense_type(expense_type.id, &state.db_connection.lock().unwrap()),
            Err(Error::NotFound)
        );
    }

    #[tokio::test]
    async fn delete_missing_expense_type_returns_404() {
        let response = delete_expense_type_endpoint(Path(999), State(get_state()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_expense_type_in_use_returns_409() {
        let state = get_state();
        let expense_type = {
            let connection = state.db_connection.lock().unwrap();
            let expense_type =
                create_expense_type(ExpenseTypeName::new_unchecked("Food"), &connection).unwrap();
            save_expense(
                ExpenseDraft {
                    id: None,
                    amount: dec!(4.20),
                    date: date!(2024 - 01 - 31),
                    expense_type_id: expense_type.id,
                    description: "Coffee".to_owned(),
                },
                &connection,
            )
            .unwrap();
            expense_type
        };

        let response = delete_expense_type_endpoint(Path(expense_type.id), State(state.clone()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_text(&html, "p[role=alert]"),
            ["Cannot delete \"Food\" because it is used by one or more expenses. \
            Delete or change those expenses first."]
        );
        assert_eq!(
            get_expense_type(expense_type.id, &state.db_connection.lock().unwrap()),
            Ok(expense_type)
        );
    }
}
