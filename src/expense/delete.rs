//! Expense deletion endpoint.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    Error, endpoints,
    expense::{ExpenseId, delete_expense, list::ExpensesPageState},
};

/// Delete the expense with `expense_id` and redirect to the expenses page.
pub async fn delete_expense_endpoint(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<ExpensesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match delete_expense(expense_id, &connection) {
        Ok(()) => {
            tracing::info!("deleted expense {expense_id}");
            Ok(Redirect::to(endpoints::EXPENSES_VIEW).into_response())
        }
        Err(error @ Error::DeleteMissingExpense) => {
            tracing::debug!("tried to delete missing expense {expense_id}");
            Err(error)
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while deleting expense {expense_id}: {error}");
            Err(error)
        }
    }
}
