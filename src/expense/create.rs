//! Expense creation endpoint.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;

use crate::{
    Error, endpoints,
    expense::{
        ExpenseDraft, ExpenseForm,
        list::{ExpensesPageState, ExpensesQuery, ExpensesView, render_expenses_page},
        save_expense,
    },
    validation::ValidationErrors,
};

/// Handle the add expense form.
///
/// Redirects to the expenses page on success. Otherwise the expenses page
/// is rendered with the submitted values and an error message for each
/// invalid field.
pub async fn create_expense_endpoint(
    State(state): State<ExpensesPageState>,
    Form(form): Form<ExpenseForm>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let errors = match form.validate() {
        // A new expense never replaces an existing one.
        Ok(draft) => match save_expense(ExpenseDraft { id: None, ..draft }, &connection) {
            Ok(expense) => {
                tracing::info!("created expense {}", expense.id);
                return Ok(Redirect::to(endpoints::EXPENSES_VIEW).into_response());
            }
            Err(Error::InvalidExpenseType(expense_type_id)) => {
                tracing::debug!("rejected expense with unknown expense type {expense_type_id}");
                let mut errors = ValidationErrors::new();
                errors.add("expense_type_id", "Choose a valid expense type");
                errors
            }
            Err(error) => {
                tracing::error!("An unexpected error occurred while creating an expense: {error}");
                return Err(error);
            }
        },
        Err(errors) => errors,
    };

    tracing::debug!(
        "rejected new expense, invalid fields: {:?}",
        errors.iter().map(|error| error.field).collect::<Vec<_>>()
    );

    let page = render_expenses_page(
        &connection,
        &state.pagination_config,
        ExpensesView {
            endpoint: endpoints::EXPENSES_VIEW,
            query: &ExpensesQuery::default(),
            form: &form,
            errors: &errors,
        },
    )?;

    Ok(page.into_response())
}
