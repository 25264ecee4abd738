//! Database operations for expenses.

use std::str::FromStr;

use rusqlite::{Connection, Row, types::Type};
use rust_decimal::Decimal;

use crate::{
    Error,
    expense::{Expense, ExpenseDraft, ExpenseId},
    expense_type::ExpenseTypeId,
};

/// Insert a new expense or replace an existing one.
///
/// A draft without an ID is inserted and gets a new ID. A draft with an ID
/// replaces every field of the saved expense with that ID.
///
/// # Errors
/// - [Error::InvalidExpenseType] if the expense type does not exist.
/// - [Error::UpdateMissingExpense] if the draft has an ID that is not in the database.
pub fn save_expense(draft: ExpenseDraft, connection: &Connection) -> Result<Expense, Error> {
    match draft.id {
        None => insert_expense(draft, connection),
        Some(id) => {
            let expense = Expense {
                id,
                amount: draft.amount,
                date: draft.date,
                expense_type_id: draft.expense_type_id,
                description: draft.description,
            };

            update_expense(&expense, connection)?;

            Ok(expense)
        }
    }
}

fn insert_expense(draft: ExpenseDraft, connection: &Connection) -> Result<Expense, Error> {
    connection
        .execute(
            "INSERT INTO expense (amount, date, expense_type_id, description)
             VALUES (?1, ?2, ?3, ?4)",
            (
                draft.amount.to_string(),
                draft.date,
                draft.expense_type_id,
                &draft.description,
            ),
        )
        .map_err(|error| map_foreign_key_error(error, draft.expense_type_id))?;

    Ok(Expense {
        id: connection.last_insert_rowid(),
        amount: draft.amount,
        date: draft.date,
        expense_type_id: draft.expense_type_id,
        description: draft.description,
    })
}

fn update_expense(expense: &Expense, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection
        .execute(
            "UPDATE expense
             SET amount = ?1, date = ?2, expense_type_id = ?3, description = ?4
             WHERE id = ?5",
            (
                expense.amount.to_string(),
                expense.date,
                expense.expense_type_id,
                &expense.description,
                expense.id,
            ),
        )
        .map_err(|error| map_foreign_key_error(error, expense.expense_type_id))?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingExpense);
    }

    Ok(())
}

fn map_foreign_key_error(error: rusqlite::Error, expense_type_id: ExpenseTypeId) -> Error {
    match error {
        // Code 787 occurs when a FOREIGN KEY constraint failed.
        // The client tried to save an expense for a non-existent expense type.
        rusqlite::Error::SqliteFailure(error, _) if error.extended_code == 787 => {
            Error::InvalidExpenseType(expense_type_id)
        }
        error => error.into(),
    }
}

/// Retrieve a single expense by ID.
///
/// # Errors
/// Returns an [Error::NotFound] if there is no expense with `expense_id`.
pub fn get_expense(expense_id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    connection
        .prepare(
            "SELECT id, amount, date, expense_type_id, description FROM expense WHERE id = :id",
        )?
        .query_row(&[(":id", &expense_id)], map_row)
        .map_err(|error| error.into())
}

/// Delete an expense by ID.
///
/// # Errors
/// Returns an [Error::DeleteMissingExpense] if there is no expense with `expense_id`.
pub fn delete_expense(expense_id: ExpenseId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM expense WHERE id = ?1", [expense_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpense);
    }

    Ok(())
}

/// The number of saved expenses.
pub fn count_expenses(connection: &Connection) -> Result<u64, Error> {
    let count: i64 = connection.query_row("SELECT COUNT(1) FROM expense", [], |row| row.get(0))?;

    Ok(u64::try_from(count).unwrap_or_default())
}

/// Initialize the expense table and indexes.
///
/// Must be called after the expense type table is created.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS expense (
            id INTEGER PRIMARY KEY,
            amount TEXT NOT NULL,
            date TEXT NOT NULL,
            expense_type_id INTEGER NOT NULL,
            description TEXT NOT NULL,
            FOREIGN KEY(expense_type_id) REFERENCES expense_type(id)
                ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);
        CREATE INDEX IF NOT EXISTS idx_expense_expense_type_id ON expense(expense_type_id);",
    )?;

    Ok(())
}

/// Amounts are stored as text so they keep their exact decimal value.
pub(super) fn read_amount(row: &Row, index: usize) -> Result<Decimal, rusqlite::Error> {
    let raw_amount: String = row.get(index)?;

    Decimal::from_str(&raw_amount)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

fn map_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        amount: read_amount(row, 1)?,
        date: row.get(2)?,
        expense_type_id: row.get(3)?,
        description: row.get(4)?,
    })
}

#[cfg(test)]
mod expense_query_tests {
    use rust_decimal_macros::dec;
    use time::macros::date;

    use crate::{
        Error,
        expense::{Expense, ExpenseDraft, count_expenses, delete_expense, get_expense, save_expense},
        expense_type::{ExpenseType, ExpenseTypeName, create_expense_type},
        test_utils::get_test_connection,
    };

    fn create_food_type(connection: &rusqlite::Connection) -> ExpenseType {
        create_expense_type(ExpenseTypeName::new_unchecked("Food"), connection)
            .expect("Could not create expense type")
    }

    fn draft(expense_type_id: i64) -> ExpenseDraft {
        ExpenseDraft {
            id: None,
            amount: dec!(10.50),
            date: date!(2024 - 03 - 15),
            expense_type_id,
            description: "Lunch, with \"friends\"".to_owned(),
        }
    }

    #[test]
    fn save_then_get_returns_same_expense() {
        let connection = get_test_connection();
        let food = create_food_type(&connection);

        let saved = save_expense(draft(food.id), &connection).unwrap();
        let got = get_expense(saved.id, &connection);

        assert!(saved.id > 0);
        assert_eq!(got, Ok(saved));
    }

    #[test]
    fn amounts_keep_exact_value() {
        let connection = get_test_connection();
        let food = create_food_type(&connection);
        let draft = ExpenseDraft {
            amount: dec!(0.10),
            ..draft(food.id)
        };

        let saved = save_expense(draft, &connection).unwrap();
        let got = get_expense(saved.id, &connection).unwrap();

        assert_eq!(got.amount, dec!(0.10));
        assert_eq!(got.amount.to_string(), "0.10");
    }

    #[test]
    fn save_with_missing_expense_type_fails() {
        let connection = get_test_connection();

        let result = save_expense(draft(42), &connection);

        assert_eq!(result, Err(Error::InvalidExpenseType(42)));
        assert_eq!(count_expenses(&connection), Ok(0));
    }

    #[test]
    fn save_with_id_replaces_every_field() {
        let connection = get_test_connection();
        let food = create_food_type(&connection);
        let rent = create_expense_type(ExpenseTypeName::new_unchecked("Rent"), &connection).unwrap();
        let saved = save_expense(draft(food.id), &connection).unwrap();

        let updated = save_expense(
            ExpenseDraft {
                id: Some(saved.id),
                amount: dec!(950),
                date: date!(2024 - 04 - 01),
                expense_type_id: rent.id,
                description: "April rent".to_owned(),
            },
            &connection,
        )
        .unwrap();

        let want = Expense {
            id: saved.id,
            amount: dec!(950),
            date: date!(2024 - 04 - 01),
            expense_type_id: rent.id,
            description: "April rent".to_owned(),
        };
        assert_eq!(updated, want);
        assert_eq!(get_expense(saved.id, &connection), Ok(want));
        assert_eq!(count_expenses(&connection), Ok(1));
    }

    #[test]
    fn save_with_missing_id_fails() {
        let connection = get_test_connection();
        let food = create_food_type(&connection);

        let result = save_expense(
            ExpenseDraft {
                id: Some(999),
                ..draft(food.id)
            },
            &connection,
        );

        assert_eq!(result, Err(Error::UpdateMissingExpense));
        assert_eq!(count_expenses(&connection), Ok(0));
    }

    #[test]
    fn get_missing_expense_returns_not_found() {
        let connection = get_test_connection();

        assert_eq!(get_expense(1, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_expense_succeeds() {
        let connection = get_test_connection();
        let food = create_food_type(&connection);
        let saved = save_expense(draft(food.id), &connection).unwrap();

        let result = delete_expense(saved.id, &connection);

        assert_eq!(result, Ok(()));
        assert_eq!(get_expense(saved.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_expense_fails() {
        let connection = get_test_connection();

        let result = delete_expense(999, &connection);

        assert_eq!(result, Err(Error::DeleteMissingExpense));
    }
}
