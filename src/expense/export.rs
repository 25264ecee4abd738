//! Exporting expenses as a CSV file.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    expense::{ExpenseRow, get_all_expenses},
};

/// The column names of the exported CSV file, in order.
pub const CSV_HEADER: [&str; 5] = ["id", "amount", "date", "expense_type", "description"];

/// Write `expenses` as CSV text: a header row followed by one row per expense.
///
/// Fields containing commas, quotes or line breaks are quoted.
///
/// # Errors
/// Returns an [Error::CsvError] if the CSV writer fails.
pub fn convert_to_csv(expenses: &[ExpenseRow]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for expense in expenses {
        writer.write_record([
            expense.id.to_string(),
            expense.amount.to_string(),
            expense.date.to_string(),
            expense.expense_type.name.to_string(),
            expense.description.clone(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}

/// The state needed for downloading expenses.
#[derive(Debug, Clone)]
pub struct DownloadExpensesState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DownloadExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Respond with every expense as the attachment "expenses.csv".
pub async fn download_expenses_endpoint(
    State(state): State<DownloadExpensesState>,
) -> Result<Response, Error> {
    let expenses = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_all_expenses(&connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve expenses: {error}"))?
    };

    let csv = convert_to_csv(&expenses)
        .inspect_err(|error| tracing::error!("Could not write expenses as CSV: {error}"))?;

    tracing::debug!("exporting {} expenses as CSV", expenses.len());

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                "attachment; filename=\"expenses.csv\"".to_owned(),
            ),
            (CONTENT_LENGTH, csv.len().to_string()),
        ],
        csv,
    )
        .into_response())
}
