//! Core expense type domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, validation::ValidationErrors};

/// The maximum number of characters in an expense type name.
pub const MAX_EXPENSE_TYPE_NAME_LENGTH: usize = 50;

/// A validated, non-empty expense type name of at most
/// [MAX_EXPENSE_TYPE_NAME_LENGTH] characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ExpenseTypeName(String);

impl ExpenseTypeName {
    /// Create an expense type name from `name` with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidExpenseTypeName] if `name`
    /// is blank or longer than [MAX_EXPENSE_TYPE_NAME_LENGTH] characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::InvalidExpenseTypeName(
                "Expense type name cannot be empty".to_owned(),
            ))
        } else if name.chars().count() > MAX_EXPENSE_TYPE_NAME_LENGTH {
            Err(Error::InvalidExpenseTypeName(format!(
                "Expense type name cannot be longer than {MAX_EXPENSE_TYPE_NAME_LENGTH} characters"
            )))
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create an expense type name without validation.
    ///
    /// The caller should ensure that the string is not empty and not too long,
    /// e.g. because it was read back from the database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for ExpenseTypeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ExpenseTypeName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpenseTypeName::new(s)
    }
}

impl Display for ExpenseTypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for an expense type.
pub type ExpenseTypeId = i64;

/// A category for expenses (e.g., 'Food', 'Rent').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct ExpenseType {
    pub id: ExpenseTypeId,
    pub name: ExpenseTypeName,
}

/// Form data for expense type creation.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExpenseTypeForm {
    pub name: String,
}

impl ExpenseTypeForm {
    /// Check the submitted name.
    ///
    /// # Errors
    ///
    /// Returns the field errors for `name` if it is not a valid [ExpenseTypeName].
    pub fn validate(&self) -> Result<ExpenseTypeName, ValidationErrors> {
        ExpenseTypeName::new(&self.name).map_err(|error| {
            let mut errors = ValidationErrors::new();
            errors.add("name", error.to_string());
            errors
        })
    }
}
