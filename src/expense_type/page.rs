//! The expense types page: the creation form and the list of expense types.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    expense_type::{
        ExpenseType, MAX_EXPENSE_TYPE_NAME_LENGTH, count_expenses_per_type, create_expense_type,
        domain::ExpenseTypeForm, get_all_expense_types,
    },
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, TYPE_BADGE_STYLE, base, delete_button, field_error,
    },
    navigation::NavBar,
};

/// The state needed for the expense types page.
#[derive(Debug, Clone)]
pub struct ExpenseTypesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExpenseTypesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Messages shown on a re-rendered expense types page.
#[derive(Debug, Default)]
pub(super) struct PageMessages<'a> {
    /// Shown under the name input.
    pub name_error: Option<&'a str>,
    /// Shown above the list of expense types.
    pub alert: Option<&'a str>,
}

/// Render the expense types page.
pub async fn get_expense_types_page(
    State(state): State<ExpenseTypesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let page = render_expense_types_page(
        &connection,
        &ExpenseTypeForm::default(),
        PageMessages::default(),
    )?;

    Ok(page.into_response())
}

/// Handle the expense type creation form.
///
/// Redirects back to the expense types page on success, otherwise the page
/// is rendered again with the submitted name and an error message.
pub async fn create_expense_type_endpoint(
    State(state): State<ExpenseTypesPageState>,
    Form(form): Form<ExpenseTypeForm>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let name = match form.validate() {
        Ok(name) => name,
        Err(errors) => {
            let messages = PageMessages {
                name_error: errors.get("name"),
                alert: None,
            };

            return render_expense_types_page(&connection, &form, messages)
                .map(IntoResponse::into_response);
        }
    };

    match create_expense_type(name, &connection) {
        Ok(expense_type) => {
            tracing::info!(
                "created expense type {} \"{}\"",
                expense_type.id,
                expense_type.name
            );
            Ok(Redirect::to(endpoints::EXPENSE_TYPES_VIEW).into_response())
        }
        Err(Error::DuplicateExpenseTypeName(name)) => {
            let message = format!("An expense type named \"{name}\" already exists");
            let messages = PageMessages {
                name_error: Some(&message),
                alert: None,
            };

            render_expense_types_page(&connection, &form, messages).map(IntoResponse::into_response)
        }
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating an expense type: {error}");
            Err(error)
        }
    }
}

/// An expense type with the number of expenses that use it.
#[derive(Debug, Clone)]
struct ExpenseTypeWithCount {
    expense_type: ExpenseType,
    expense_count: u32,
}

pub(super) fn render_expense_types_page(
    connection: &Connection,
    form: &ExpenseTypeForm,
    messages: PageMessages<'_>,
) -> Result<Markup, Error> {
    let expense_types = get_all_expense_types(connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve expense types: {error}"))?;

    let expenses_per_type = count_expenses_per_type(connection)
        .inspect_err(|error| tracing::error!("Could not count expenses per type: {error}"))?;

    let expense_types = expense_types
        .into_iter()
        .map(|expense_type| ExpenseTypeWithCount {
            expense_count: expenses_per_type
                .get(&expense_type.id)
                .copied()
                .unwrap_or(0),
            expense_type,
        })
        .collect::<Vec<_>>();

    Ok(expense_types_view(&expense_types, form, messages))
}

fn expense_types_view(
    expense_types: &[ExpenseTypeWithCount],
    form: &ExpenseTypeForm,
    messages: PageMessages<'_>,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::EXPENSE_TYPES_VIEW).into_html();

    let table_row = |row: &ExpenseTypeWithCount| {
        let delete_url =
            endpoints::format_endpoint(endpoints::DELETE_EXPENSE_TYPE, row.expense_type.id);
        let confirm_message = if row.expense_count > 0 {
            format!(
                "'{}' is used by {} expense(s) and cannot be deleted until they are removed. Try anyway?",
                row.expense_type.name, row.expense_count
            )
        } else {
            format!(
                "Are you sure you want to delete '{}'?",
                row.expense_type.name
            )
        };

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(TYPE_BADGE_STYLE) { (row.expense_type.name) }
                }

                td class=(TABLE_CELL_STYLE) { (row.expense_count) }

                td class=(TABLE_CELL_STYLE)
                {
                    (delete_button(&delete_url, &confirm_message))
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class=(FORM_CONTAINER_STYLE)
            {
                h1 class="text-xl font-bold mb-4" { "Expense Types" }

                form
                    method="post"
                    action=(endpoints::EXPENSE_TYPES_VIEW)
                    class="w-full space-y-4 md:space-y-6"
                {
                    div
                    {
                        label for="name" class=(FORM_LABEL_STYLE) { "Expense Type Name" }

                        input
                            id="name"
                            type="text"
                            name="name"
                            value=(form.name)
                            placeholder="e.g. Food"
                            maxlength=(MAX_EXPENSE_TYPE_NAME_LENGTH)
                            required
                            autofocus
                            class=(FORM_TEXT_INPUT_STYLE);

                        (field_error(messages.name_error))
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense Type" }
                }
            }

            @if let Some(alert) = messages.alert {
                p role="alert" class=(FORM_ERROR_STYLE) { (alert) }
            }

            section class="dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto mt-8"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Expenses" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                        }
                    }

                    tbody
                    {
                        @for row in expense_types {
                            (table_row(row))
                        }

                        @if expense_types.is_empty() {
                            tr
                            {
                                td
                                    colspan="3"
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "No expense types yet. Add one above to start recording expenses."
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Expense Types", &content)
}
