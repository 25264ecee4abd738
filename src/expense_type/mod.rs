//! Expense types for categorizing expenses.

mod db;
mod delete;
mod domain;
mod page;

pub use db::{
    count_expenses_per_type, create_expense_type, create_expense_type_table, delete_expense_type,
    get_all_expense_types, get_expense_type,
};
pub use delete::delete_expense_type_endpoint;
pub use domain::{ExpenseType, ExpenseTypeId, ExpenseTypeName, MAX_EXPENSE_TYPE_NAME_LENGTH};
pub use page::{create_expense_type_endpoint, get_expense_types_page};
