//! Core expense domain types and form validation.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::{
    expense_type::{ExpenseType, ExpenseTypeId},
    validation::ValidationErrors,
};

/// The maximum number of characters in an expense description.
pub const MAX_DESCRIPTION_LENGTH: usize = 255;

/// The largest amount a single expense may have, $1,000,000,000.00.
///
/// Keeps the sum of every expense far below the largest [Decimal].
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Database identifier for an expense.
pub type ExpenseId = i64;

/// An amount of money spent on a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    /// A non-negative amount with at most two decimal places.
    pub amount: Decimal,
    pub date: Date,
    pub expense_type_id: ExpenseTypeId,
    pub description: String,
}

/// An expense joined with its expense type, used for display and export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRow {
    pub id: ExpenseId,
    pub amount: Decimal,
    pub date: Date,
    pub expense_type: ExpenseType,
    pub description: String,
}

/// A validated expense that has either not been saved yet (`id` is `None`)
/// or that should replace the saved expense with the same ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub id: Option<ExpenseId>,
    pub amount: Decimal,
    pub date: Date,
    pub expense_type_id: ExpenseTypeId,
    pub description: String,
}

/// The raw values submitted by the add and edit expense forms.
///
/// The fields are kept as text so that invalid input can be shown back to
/// the user next to its error message.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseForm {
    #[serde(default)]
    pub id: Option<ExpenseId>,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub expense_type_id: String,
    #[serde(default)]
    pub description: String,
}

impl ExpenseForm {
    /// Check every field and convert the form into an [ExpenseDraft].
    ///
    /// # Errors
    ///
    /// Returns one error per invalid field.
    pub fn validate(&self) -> Result<ExpenseDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let amount = parse_amount(&self.amount)
            .map_err(|message| errors.add("amount", message))
            .ok();

        let date = parse_date(&self.date)
            .map_err(|message| errors.add("date", message))
            .ok();

        let expense_type_id = parse_expense_type_id(&self.expense_type_id)
            .map_err(|message| errors.add("expense_type_id", message))
            .ok();

        let description = parse_description(&self.description)
            .map_err(|message| errors.add("description", message))
            .ok();

        match (amount, date, expense_type_id, description) {
            (Some(amount), Some(date), Some(expense_type_id), Some(description))
                if errors.is_empty() =>
            {
                Ok(ExpenseDraft {
                    id: self.id,
                    amount,
                    date,
                    expense_type_id,
                    description,
                })
            }
            _ => Err(errors),
        }
    }
}

impl From<&Expense> for ExpenseForm {
    fn from(expense: &Expense) -> Self {
        Self {
            id: Some(expense.id),
            amount: expense.amount.to_string(),
            date: expense.date.to_string(),
            expense_type_id: expense.expense_type_id.to_string(),
            description: expense.description.clone(),
        }
    }
}

fn parse_amount(text: &str) -> Result<Decimal, &'static str> {
    let text = text.trim();

    if text.is_empty() {
        return Err("Amount is required");
    }

    let amount = Decimal::from_str(text).map_err(|_| "Amount must be a number, e.g. 12.50")?;

    if amount.is_zero() {
        return Ok(Decimal::ZERO);
    }

    if amount.is_sign_negative() {
        return Err("Amount cannot be negative");
    }

    if amount > MAX_AMOUNT {
        return Err("Amount cannot be more than $1,000,000,000.00");
    }

    if amount.normalize().scale() > 2 {
        return Err("Amount can have at most two decimal places");
    }

    // Drops trailing zeros past the cents, e.g. "1.500" is stored as "1.50".
    Ok(amount.round_dp(2))
}

fn parse_date(text: &str) -> Result<Date, &'static str> {
    let text = text.trim();

    if text.is_empty() {
        return Err("Date is required");
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|_| "Date must be a valid date in the format YYYY-MM-DD")
}

fn parse_expense_type_id(text: &str) -> Result<ExpenseTypeId, &'static str> {
    let text = text.trim();

    if text.is_empty() {
        return Err("Choose an expense type");
    }

    text.parse().map_err(|_| "Choose a valid expense type")
}

fn parse_description(text: &str) -> Result<String, String> {
    let text = text.trim();

    if text.is_empty() {
        Err("Description is required".to_owned())
    } else if text.chars().count() > MAX_DESCRIPTION_LENGTH {
        Err(format!(
            "Description cannot be longer than {MAX_DESCRIPTION_LENGTH} characters"
        ))
    } else {
        Ok(text.to_owned())
    }
}
