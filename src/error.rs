//! Defines the app level error type and conversions to rendered HTML pages.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    expense_type::ExpenseTypeId, html::error_view, internal_server_error::InternalServerError,
    not_found::NotFoundError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An expense type with the same name already exists.
    ///
    /// Expense type names are unique, the client should pick a different
    /// name or use the existing expense type.
    #[error("the expense type \"{0}\" already exists")]
    DuplicateExpenseTypeName(String),

    /// The expense type name is empty or too long.
    #[error("{0}")]
    InvalidExpenseTypeName(String),

    /// The expense type is still used by at least one expense and cannot be
    /// deleted.
    #[error("the expense type \"{0}\" is used by one or more expenses")]
    ExpenseTypeInUse(String),

    /// The expense type ID used to save an expense does not refer to an
    /// existing expense type.
    #[error("the expense type ID {0} does not refer to a valid expense type")]
    InvalidExpenseType(ExpenseTypeId),

    /// A filter parameter could not be understood, e.g. an unknown month name.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update an expense that does not exist
    #[error("tried to update an expense that is not in the database")]
    UpdateMissingExpense,

    /// Tried to delete an expense that does not exist
    #[error("tried to delete an expense that is not in the database")]
    DeleteMissingExpense,

    /// Tried to delete an expense type that does not exist
    #[error("tried to delete an expense type that is not in the database")]
    DeleteMissingExpenseType,

    /// The sum of the expense amounts is too large to represent exactly.
    #[error("the total amount of the expenses is too large")]
    TotalOverflow,

    /// The expenses could not be written as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound
            | Error::UpdateMissingExpense
            | Error::DeleteMissingExpense
            | Error::DeleteMissingExpenseType => NotFoundError.into_response(),
            Error::InvalidFilter(reason) => (
                StatusCode::BAD_REQUEST,
                error_view(
                    "Bad Request",
                    "400",
                    "Invalid filter",
                    &format!("{reason}. Check the filter values and try again."),
                ),
            )
                .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
