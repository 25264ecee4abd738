//! The expenses page: the list of expenses with filters, the total amount and
//! the form for adding an expense.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Month;

use crate::{
    AppState, Error, endpoints,
    expense::{
        ExpenseForm, ExpenseRow,
        form::{expense_form_fields, today},
        get_all_expenses, get_expenses_page, get_total_amount,
        query::{ExpenseFilter, parse_month},
    },
    expense_type::{ExpenseType, get_all_expense_types},
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        TYPE_BADGE_STYLE, base, delete_button, format_currency,
    },
    navigation::NavBar,
    pagination::{
        PageQuery, PageRequest, PaginationConfig, create_pagination_indicators, pagination_view,
    },
    validation::ValidationErrors,
};

/// The state needed for the expenses pages.
#[derive(Debug, Clone)]
pub struct ExpensesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ExpensesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The query parameters of the expenses pages.
///
/// Missing or empty filter values mean "do not filter".
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExpensesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// A month name, e.g. "March" or "mar", or a month number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(rename = "expenseTypeFilter", skip_serializing_if = "Option::is_none")]
    pub expense_type_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
}

impl ExpensesQuery {
    fn filter(&self) -> Result<ExpenseFilter, Error> {
        let month = self
            .month
            .as_deref()
            .map(str::trim)
            .filter(|month| !month.is_empty())
            .map(parse_month)
            .transpose()?;

        ExpenseFilter::from_params(self.year, month, self.expense_type_filter.as_deref())
    }

    fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            per_page: self.per_page,
        }
    }

    /// The URL of `page` on `endpoint` with the same filters and page size.
    fn page_url(&self, endpoint: &str, page: u64) -> String {
        let query = ExpensesQuery {
            page: Some(page),
            ..self.clone()
        };

        match serde_urlencoded::to_string(&query) {
            Ok(query_string) => format!("{endpoint}?{query_string}"),
            Err(error) => {
                tracing::error!("could not encode pagination query {query:?}: {error}");
                format!("{endpoint}?page={page}")
            }
        }
    }
}

/// Render the first page of all expenses, or the page given by the `page` parameter.
pub async fn get_expenses_view(
    State(state): State<ExpensesPageState>,
    Query(page_query): Query<PageQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let query = ExpensesQuery {
        page: page_query.page,
        per_page: page_query.per_page,
        ..Default::default()
    };

    let page = render_expenses_page(
        &connection,
        &state.pagination_config,
        ExpensesView {
            endpoint: endpoints::EXPENSES_VIEW,
            query: &query,
            form: &new_expense_form(),
            errors: &ValidationErrors::new(),
        },
    )?;

    Ok(page.into_response())
}

/// Render the expenses that match the year, month and expense type filters.
pub async fn get_filtered_expenses_page(
    State(state): State<ExpensesPageState>,
    Query(query): Query<ExpensesQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let page = render_expenses_page(
        &connection,
        &state.pagination_config,
        ExpensesView {
            endpoint: endpoints::FILTERED_EXPENSES_VIEW,
            query: &query,
            form: &new_expense_form(),
            errors: &ValidationErrors::new(),
        },
    )?;

    Ok(page.into_response())
}

/// An empty add expense form with today's date.
pub(super) fn new_expense_form() -> ExpenseForm {
    ExpenseForm {
        date: today().to_string(),
        ..Default::default()
    }
}

/// What to show on the expenses page.
pub(super) struct ExpensesView<'a> {
    /// The endpoint the pagination links point to.
    pub endpoint: &'static str,
    pub query: &'a ExpensesQuery,
    /// The values for the add expense form.
    pub form: &'a ExpenseForm,
    /// The errors for the add expense form.
    pub errors: &'a ValidationErrors,
}

pub(super) fn render_expenses_page(
    connection: &Connection,
    pagination_config: &PaginationConfig,
    view: ExpensesView<'_>,
) -> Result<Markup, Error> {
    let filter = view
        .query
        .filter()
        .inspect_err(|error| tracing::debug!("rejected expense filter {:?}: {error}", view.query))?;
    let page_request = PageRequest::new(view.query.page_query(), pagination_config);

    let page = get_expenses_page(&filter, page_request, connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?;

    let total_amount = get_total_amount(
        &get_all_expenses(connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?,
    )
    .inspect_err(|error| tracing::error!("Could not add up the expenses: {error}"))?;

    let expense_types = get_all_expense_types(connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve expense types: {error}"))?;

    let indicators =
        create_pagination_indicators(page.page, page.page_count(), pagination_config.max_pages);
    let pagination = pagination_view(&indicators, |page_number| {
        view.query.page_url(view.endpoint, page_number)
    });

    let showing = match (filter.year_month(), filter.expense_type()) {
        (Some(year_month), Some(expense_type)) => {
            Some(format!("Showing {expense_type} expenses for {year_month}"))
        }
        (Some(year_month), None) => Some(format!("Showing {year_month}")),
        (None, Some(expense_type)) => Some(format!("Showing {expense_type} expenses")),
        (None, None) => None,
    };

    let content = html!(
        (NavBar::new(view.endpoint).into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full lg:max-w-5xl space-y-6"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Expenses" }

                    p id="total-amount" class="text-lg"
                    {
                        "Total: " (format_currency(total_amount))
                    }

                    a href=(endpoints::DOWNLOAD_EXPENSES) class=(LINK_STYLE) download
                    {
                        "Download CSV"
                    }
                }

                (add_expense_form_view(view.form, &expense_types, view.errors))

                (filter_form_view(view.query, &expense_types))

                @if let Some(showing) = &showing {
                    h2 id="showing" class="text-lg font-semibold" { (showing) }
                }

                (expenses_table_view(&page.items))

                (pagination)
            }
        }
    );

    Ok(base("Expenses", &content))
}

fn add_expense_form_view(
    form: &ExpenseForm,
    expense_types: &[ExpenseType],
    errors: &ValidationErrors,
) -> Markup {
    html! {
        section class="space-y-4"
        {
            h2 class="text-lg font-semibold" { "Add Expense" }

            @if expense_types.is_empty() {
                p
                {
                    "Expenses need an expense type. "
                    a href=(endpoints::EXPENSE_TYPES_VIEW) class=(LINK_STYLE)
                    {
                        "Create your first expense type"
                    }
                }
            }

            form
                method="post"
                action=(endpoints::ADD_EXPENSE)
                class="grid gap-4 md:grid-cols-2"
            {
                (expense_form_fields(form, expense_types, errors))

                div class="md:col-span-2"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Expense" }
                }
            }
        }
    }
}

fn filter_form_view(query: &ExpensesQuery, expense_types: &[ExpenseType]) -> Markup {
    let selected_month = query
        .month
        .as_deref()
        .and_then(|month| parse_month(month).ok());
    let selected_type = query.expense_type_filter.as_deref().unwrap_or_default();
    let months = (1..=12u8).filter_map(|number| Month::try_from(number).ok());

    html! {
        form
            method="get"
            action=(endpoints::FILTERED_EXPENSES_VIEW)
            class="flex flex-wrap items-end gap-4"
        {
            div
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Year" }

                input
                    id="year"
                    type="number"
                    name="year"
                    value=[query.year]
                    placeholder="e.g. 2024"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="month" class=(FORM_LABEL_STYLE) { "Month" }

                select id="month" name="month" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[selected_month.is_none()] { "Any month" }

                    @for month in months {
                        option value=(month) selected[selected_month == Some(month)] { (month) }
                    }
                }
            }

            div
            {
                label for="expenseTypeFilter" class=(FORM_LABEL_STYLE) { "Expense Type" }

                select id="expenseTypeFilter" name="expenseTypeFilter" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected[selected_type.is_empty()] { "All types" }

                    @for expense_type in expense_types {
                        option
                            value=(expense_type.name)
                            selected[expense_type.name.to_string() == selected_type]
                        {
                            (expense_type.name)
                        }
                    }
                }
            }

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Filter" }

            a href=(endpoints::EXPENSES_VIEW) class=(LINK_STYLE) { "Clear" }
        }
    }
}

fn expenses_table_view(expenses: &[ExpenseRow]) -> Markup {
    let table_row = |expense: &ExpenseRow| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_EXPENSE_VIEW, expense.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_EXPENSE, expense.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? This cannot be undone.",
            expense.description
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE) { time datetime=(expense.date) { (expense.date) } }
                td class=(TABLE_CELL_STYLE) { (expense.description) }
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(TYPE_BADGE_STYLE) { (expense.expense_type.name) }
                }
                td class="px-6 py-4 text-right" { (format_currency(expense.amount)) }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        a href=(edit_url) class=(LINK_STYLE) { "Edit" }
                        (delete_button(&delete_url, &confirm_message))
                    }
                }
            }
        )
    };

    html! {
        section class="dark:bg-gray-800"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                        th scope="col" class="px-6 py-4 text-right" { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @for expense in expenses {
                        (table_row(expense))
                    }

                    @if expenses.is_empty() {
                        tr
                        {
                            td
                                colspan="5"
                                class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                            {
                                "No expenses found."
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod expenses_query_tests {
    use time::Month;

    use crate::{
        Error,
        expense::query::{ExpenseFilter, YearMonth},
    };

    use super::ExpensesQuery;

    #[test]
    fn empty_values_mean_no_filter() {
        let query = ExpensesQuery {
            year: None,
            month: Some(String::new()),
            expense_type_filter: Some(String::new()),
            ..Default::default()
        };

        assert_eq!(query.filter(), Ok(ExpenseFilter::All));
    }

    #[test]
    fn parses_month_names() {
        let query = ExpensesQuery {
            year: Some(2024),
            month: Some("MARCH".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            query.filter(),
            Ok(ExpenseFilter::YearMonth(
                YearMonth::new(2024, Month::March).unwrap()
            ))
        );
    }

    #[test]
    fn invalid_month_is_an_error() {
        let query = ExpensesQuery {
            year: Some(2024),
            month: Some("Smarch".to_owned()),
            ..Default::default()
        };

        assert!(matches!(query.filter(), Err(Error::InvalidFilter(_))));
    }

    #[test]
    fn page_url_keeps_filters() {
        let query = ExpensesQuery {
            year: Some(2024),
            month: Some("March".to_owned()),
            expense_type_filter: Some("Eating Out".to_owned()),
            page: Some(1),
            per_page: None,
        };

        let url = query.page_url("/expenses/filter", 2);

        assert_eq!(
            url,
            "/expenses/filter?year=2024&month=March&expenseTypeFilter=Eating+Out&page=2"
        );
    }
}
