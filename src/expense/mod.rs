//! Recording, listing, filtering and exporting expenses.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod export;
mod form;
mod list;
mod query;

pub use create::create_expense_endpoint;
pub use db::{count_expenses, create_expense_table, delete_expense, get_expense, save_expense};
pub use delete::delete_expense_endpoint;
pub use domain::{
    Expense, ExpenseDraft, ExpenseForm, ExpenseId, ExpenseRow, MAX_AMOUNT, MAX_DESCRIPTION_LENGTH,
};
pub use edit::{get_edit_expense_page, update_expense_endpoint};
pub use export::{CSV_HEADER, convert_to_csv, download_expenses_endpoint};
pub use list::{get_expenses_view, get_filtered_expenses_page};
pub use query::{
    ExpenseFilter, YearMonth, get_all_expenses, get_expenses_by_type, get_expenses_by_year_month,
    get_expenses_by_year_month_and_type, get_expenses_page, get_total_amount, parse_month,
};
