//! Expense Tracker is a web app for recording and reviewing your expenses.
//!
//! Expenses are grouped by expense type, can be filtered by month and type,
//! and can be downloaded as a CSV file.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod error;
mod expense;
mod expense_type;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod pagination;
mod routing;
mod validation;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use expense::{
    CSV_HEADER, Expense, ExpenseDraft, ExpenseFilter, ExpenseId, ExpenseRow, MAX_AMOUNT,
    MAX_DESCRIPTION_LENGTH, YearMonth, convert_to_csv, count_expenses, delete_expense,
    get_all_expenses, get_expense, get_expenses_by_type, get_expenses_by_year_month,
    get_expenses_by_year_month_and_type, get_expenses_page, get_total_amount, parse_month,
    save_expense,
};
pub use expense_type::{
    ExpenseType, ExpenseTypeId, ExpenseTypeName, MAX_EXPENSE_TYPE_NAME_LENGTH,
    count_expenses_per_type, create_expense_type, delete_expense_type, get_all_expense_types,
    get_expense_type,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::{Page, PageQuery, PageRequest, PaginationConfig};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to listen for the Ctrl+C signal: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
