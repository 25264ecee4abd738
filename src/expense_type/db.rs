//! Database operations for expense types.

use std::collections::HashMap;

use rusqlite::{Connection, Row};

use crate::{
    Error,
    expense_type::{ExpenseType, ExpenseTypeId, ExpenseTypeName},
};

/// Create an expense type and return it with its generated ID.
///
/// The uniqueness check is the `UNIQUE` constraint on the name column, so
/// the check and the insert happen in a single statement.
///
/// # Errors
/// Returns an [Error::DuplicateExpenseTypeName] if an expense type named
/// `name` already exists.
pub fn create_expense_type(
    name: ExpenseTypeName,
    connection: &Connection,
) -> Result<ExpenseType, Error> {
    connection
        .execute(
            "INSERT INTO expense_type (name) VALUES (?1);",
            (name.as_ref(),),
        )
        .map_err(|error| match error {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(error, _) if error.extended_code == 2067 => {
                Error::DuplicateExpenseTypeName(name.to_string())
            }
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(ExpenseType { id, name })
}

/// Retrieve a single expense type by ID.
pub fn get_expense_type(
    expense_type_id: ExpenseTypeId,
    connection: &Connection,
) -> Result<ExpenseType, Error> {
    connection
        .prepare("SELECT id, name FROM expense_type WHERE id = :id;")?
        .query_row(&[(":id", &expense_type_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve all expense types in the order they were created.
pub fn get_all_expense_types(connection: &Connection) -> Result<Vec<ExpenseType>, Error> {
    connection
        .prepare("SELECT id, name FROM expense_type ORDER BY id ASC;")?
        .query_map([], map_row)?
        .map(|maybe_expense_type| maybe_expense_type.map_err(|error| error.into()))
        .collect()
}

/// Delete an expense type by ID.
///
/// # Errors
/// Returns an [Error::ExpenseTypeInUse] if any expense refers to the expense
/// type, or an [Error::DeleteMissingExpenseType] if it does not exist.
pub fn delete_expense_type(
    expense_type_id: ExpenseTypeId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection
        .execute("DELETE FROM expense_type WHERE id = ?1", [expense_type_id])
        .map_err(|error| match error {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            // The expense type is still referenced by an expense.
            rusqlite::Error::SqliteFailure(error, _) if error.extended_code == 787 => {
                let name = get_expense_type(expense_type_id, connection)
                    .map(|expense_type| expense_type.name.to_string())
                    .unwrap_or_else(|_| expense_type_id.to_string());

                Error::ExpenseTypeInUse(name)
            }
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingExpenseType);
    }

    Ok(())
}

/// Count how many expenses use each expense type.
///
/// Expense types without any expenses are not in the map.
pub fn count_expenses_per_type(
    connection: &Connection,
) -> Result<HashMap<ExpenseTypeId, u32>, Error> {
    let result: Result<HashMap<ExpenseTypeId, u32>, rusqlite::Error> = connection
        .prepare("SELECT expense_type_id, COUNT(1) FROM expense GROUP BY expense_type_id")?
        .query_map((), |row| {
            let expense_type_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((expense_type_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

/// Initialize the expense type table.
pub fn create_expense_type_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense_type (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        );",
        (),
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<ExpenseType, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = ExpenseTypeName::new_unchecked(&raw_name);

    Ok(ExpenseType { id, name })
}
