//! The edit expense page and the endpoint for updating an expense.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};

use crate::{
    Error, endpoints,
    expense::{
        ExpenseForm, ExpenseId, form::expense_form_fields, get_expense, list::ExpensesPageState,
        save_expense,
    },
    expense_type::{ExpenseType, get_all_expense_types},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base},
    navigation::NavBar,
    validation::ValidationErrors,
};

/// Render the edit page for the expense with `expense_id`.
pub async fn get_edit_expense_page(
    Path(expense_id): Path<ExpenseId>,
    State(state): State<ExpensesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let expense = get_expense(expense_id, &connection)
        .inspect_err(|error| tracing::debug!("could not get expense {expense_id}: {error}"))?;

    let expense_types = get_all_expense_types(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve expense types: {error}"))?;

    Ok(edit_expense_view(
        &ExpenseForm::from(&expense),
        &expense_types,
        &ValidationErrors::new(),
    )
    .into_response())
}

/// Handle the edit expense form, replacing every field of the expense with
/// the ID given in the form.
pub async fn update_expense_endpoint(
    State(state): State<ExpensesPageState>,
    Form(form): Form<ExpenseForm>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let Some(expense_id) = form.id else {
        tracing::debug!("rejected expense update without an ID");
        return Err(Error::UpdateMissingExpense);
    };

    let errors = match form.validate() {
        Ok(draft) => match save_expense(draft, &connection) {
            Ok(_) => {
                tracing::info!("updated expense {expense_id}");
                return Ok(Redirect::to(endpoints::EXPENSES_VIEW).into_response());
            }
            Err(Error::InvalidExpenseType(expense_type_id)) => {
                tracing::debug!("rejected expense with unknown expense type {expense_type_id}");
                let mut errors = ValidationErrors::new();
                errors.add("expense_type_id", "Choose a valid expense type");
                errors
            }
            Err(error @ Error::UpdateMissingExpense) => {
                tracing::debug!("tried to update missing expense {expense_id}");
                return Err(error);
            }
            Err(error) => {
                tracing::error!(
                    "An unexpected error occurred while updating expense {expense_id}: {error}"
                );
                return Err(error);
            }
        },
        Err(errors) => errors,
    };

    let expense_types = get_all_expense_types(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve expense types: {error}"))?;

    Ok(edit_expense_view(&form, &expense_types, &errors).into_response())
}

fn edit_expense_view(
    form: &ExpenseForm,
    expense_types: &[ExpenseType],
    errors: &ValidationErrors,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EDIT_EXPENSE_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold mb-4" { "Edit Expense" }

            form
                method="post"
                action=(endpoints::UPDATE_EXPENSE)
                class="w-full space-y-4 md:space-y-6"
            {
                (expense_form_fields(form, expense_types, errors))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Update Expense" }
            }

            a href=(endpoints::EXPENSES_VIEW) class=(LINK_STYLE) { "Cancel" }
        }
    };

    base("Edit Expense", &content)
}
