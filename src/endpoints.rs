//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/update/{expense_id}', use [format_endpoint].

/// The root route which redirects to the expenses page.
pub const ROOT: &str = "/";
/// The page listing expenses with the form for adding an expense.
pub const EXPENSES_VIEW: &str = "/expenses";
/// The page listing expenses filtered by month and/or expense type.
pub const FILTERED_EXPENSES_VIEW: &str = "/expenses/filter";
/// The route for creating an expense.
pub const ADD_EXPENSE: &str = "/AddExpense";
/// The page for editing an existing expense.
pub const EDIT_EXPENSE_VIEW: &str = "/update/{expense_id}";
/// The route for updating an expense, the expense ID is part of the form.
pub const UPDATE_EXPENSE: &str = "/update";
/// The route to delete a single expense.
pub const DELETE_EXPENSE: &str = "/expenses/delete/individual/{expense_id}";
/// The page listing expense types with the form for creating one.
pub const EXPENSE_TYPES_VIEW: &str = "/newExpenseType";
/// The route to delete an expense type.
pub const DELETE_EXPENSE_TYPE: &str = "/newExpenseType/delete/{expense_type_id}";
/// The route for downloading all expenses as a CSV file.
pub const DOWNLOAD_EXPENSES: &str = "/downloadExpenses";
/// The route for static files.
pub const STATIC: &str = "/static";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/update/{expense_id}', '{expense_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::EXPENSES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::FILTERED_EXPENSES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::ADD_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::EDIT_EXPENSE_VIEW);
        assert_endpoint_is_valid_uri(endpoints::UPDATE_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::DELETE_EXPENSE);
        assert_endpoint_is_valid_uri(endpoints::EXPENSE_TYPES_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DELETE_EXPENSE_TYPE);
        assert_endpoint_is_valid_uri(endpoints::DOWNLOAD_EXPENSES);
        assert_endpoint_is_valid_uri(endpoints::STATIC);
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint(endpoints::EDIT_EXPENSE_VIEW, 1);

        assert_eq!(formatted_path, "/update/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint(endpoints::UPDATE_EXPENSE, 1);

        assert_eq!(formatted_path, "/update");
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/expenses/{expense_id}/edit", 42);

        assert_eq!(formatted_path, "/expenses/42/edit");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
