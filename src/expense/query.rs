//! Filtered and paginated retrieval of expenses.

use std::fmt::Display;

use rusqlite::{Connection, Row, named_params};
use rust_decimal::Decimal;
use time::{Date, Month};

use crate::{
    Error,
    expense::{ExpenseRow, db::read_amount},
    expense_type::{ExpenseType, ExpenseTypeName},
    pagination::{Page, PageRequest},
};

/// A calendar month of a specific year, e.g. March 2024.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearMonth {
    first_day: Date,
}

impl YearMonth {
    /// # Errors
    /// Returns an [Error::InvalidFilter] if `year` is outside the range of supported dates.
    pub fn new(year: i32, month: Month) -> Result<Self, Error> {
        let first_day = Date::from_calendar_date(year, month, 1)
            .map_err(|_| Error::InvalidFilter(format!("the year {year} is out of range")))?;

        Ok(Self { first_day })
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> Month {
        self.first_day.month()
    }

    pub fn first_day(&self) -> Date {
        self.first_day
    }

    pub fn last_day(&self) -> Date {
        let mut last_day = self.first_day;

        while let Some(next_day) = last_day.next_day() {
            if next_day.month() != self.month() {
                break;
            }

            last_day = next_day;
        }

        last_day
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month(), self.year())
    }
}

/// Which expenses to show in the expenses list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseFilter {
    /// Every expense.
    All,
    /// Expenses dated within a month.
    YearMonth(YearMonth),
    /// Expenses whose expense type has exactly this name.
    Type(String),
    /// Expenses dated within a month that also have the expense type.
    YearMonthAndType(YearMonth, String),
}

impl ExpenseFilter {
    /// Choose a filter from the optional filter parameters.
    ///
    /// The date filter only applies when both `year` and `month` are given.
    /// An empty `expense_type` means no expense type filter. In order of
    /// precedence:
    /// 1. year, month and expense type,
    /// 2. year and month,
    /// 3. expense type,
    /// 4. everything.
    ///
    /// # Errors
    /// Returns an [Error::InvalidFilter] if the year is out of range.
    pub fn from_params(
        year: Option<i32>,
        month: Option<Month>,
        expense_type: Option<&str>,
    ) -> Result<Self, Error> {
        let expense_type = expense_type.filter(|name| !name.is_empty());

        let filter = match (year, month, expense_type) {
            (Some(year), Some(month), Some(name)) => {
                ExpenseFilter::YearMonthAndType(YearMonth::new(year, month)?, name.to_owned())
            }
            (Some(year), Some(month), None) => ExpenseFilter::YearMonth(YearMonth::new(year, month)?),
            (_, _, Some(name)) => ExpenseFilter::Type(name.to_owned()),
            _ => ExpenseFilter::All,
        };

        Ok(filter)
    }

    /// The month this filter limits expenses to, if any.
    pub fn year_month(&self) -> Option<YearMonth> {
        match self {
            ExpenseFilter::YearMonth(year_month)
            | ExpenseFilter::YearMonthAndType(year_month, _) => Some(*year_month),
            ExpenseFilter::All | ExpenseFilter::Type(_) => None,
        }
    }

    /// The expense type name this filter limits expenses to, if any.
    pub fn expense_type(&self) -> Option<&str> {
        match self {
            ExpenseFilter::Type(name) | ExpenseFilter::YearMonthAndType(_, name) => Some(name),
            ExpenseFilter::All | ExpenseFilter::YearMonth(_) => None,
        }
    }
}

/// Parse an English month name (full or abbreviated, any case) or a month
/// number from 1 to 12.
///
/// # Errors
/// Returns an [Error::InvalidFilter] if `text` is not a month.
pub fn parse_month(text: &str) -> Result<Month, Error> {
    let text = text.trim();

    if let Ok(number) = text.parse::<u8>() {
        return Month::try_from(number)
            .map_err(|_| Error::InvalidFilter(format!("{number} is not a month number")));
    }

    let lowercase = text.to_lowercase();

    (1..=12u8)
        .filter_map(|number| Month::try_from(number).ok())
        .find(|month| {
            let name = month.to_string().to_lowercase();
            lowercase == name || (lowercase.len() == 3 && name.starts_with(&lowercase))
        })
        .ok_or_else(|| Error::InvalidFilter(format!("\"{text}\" is not a month")))
}

const SELECT_EXPENSE_ROWS: &str = "SELECT expense.id, expense.amount, expense.date, \
    expense.description, expense_type.id, expense_type.name
    FROM expense
    INNER JOIN expense_type ON expense.expense_type_id = expense_type.id";

const FILTER_CLAUSE: &str = "WHERE (:start IS NULL OR expense.date BETWEEN :start AND :end)
    AND (:type_name IS NULL OR expense_type.name = :type_name)";

const ORDER_CLAUSE: &str = "ORDER BY expense.date DESC, expense.id DESC";

/// Retrieve every expense, newest first.
pub fn get_all_expenses(connection: &Connection) -> Result<Vec<ExpenseRow>, Error> {
    connection
        .prepare(&format!("{SELECT_EXPENSE_ROWS} {ORDER_CLAUSE}"))?
        .query_map([], map_row)?
        .map(|maybe_row| maybe_row.map_err(Error::from))
        .collect()
}

/// Retrieve one page of the expenses that match `filter`, newest first.
///
/// Expenses on the same day are ordered by ID so that pages do not overlap.
pub fn get_expenses_page(
    filter: &ExpenseFilter,
    page: PageRequest,
    connection: &Connection,
) -> Result<Page<ExpenseRow>, Error> {
    let year_month = filter.year_month();
    let start = year_month.map(|year_month| year_month.first_day());
    let end = year_month.map(|year_month| year_month.last_day());
    let type_name = filter.expense_type();

    let total_items: i64 = connection.query_row(
        &format!(
            "SELECT COUNT(1) FROM expense
            INNER JOIN expense_type ON expense.expense_type_id = expense_type.id
            {FILTER_CLAUSE}"
        ),
        named_params! {
            ":start": start,
            ":end": end,
            ":type_name": type_name,
        },
        |row| row.get(0),
    )?;

    let limit = i64::try_from(page.page_size).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

    let items = connection
        .prepare(&format!(
            "{SELECT_EXPENSE_ROWS} {FILTER_CLAUSE} {ORDER_CLAUSE} LIMIT :limit OFFSET :offset"
        ))?
        .query_map(
            named_params! {
                ":start": start,
                ":end": end,
                ":type_name": type_name,
                ":limit": limit,
                ":offset": offset,
            },
            map_row,
        )?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;

    Ok(Page {
        items,
        page: page.page,
        page_size: page.page_size,
        total_items: u64::try_from(total_items).unwrap_or_default(),
    })
}

/// Retrieve one page of the expenses dated within `year_month`.
pub fn get_expenses_by_year_month(
    year_month: YearMonth,
    page: PageRequest,
    connection: &Connection,
) -> Result<Page<ExpenseRow>, Error> {
    get_expenses_page(&ExpenseFilter::YearMonth(year_month), page, connection)
}

/// Retrieve one page of the expenses whose expense type is named `type_name`.
pub fn get_expenses_by_type(
    type_name: &str,
    page: PageRequest,
    connection: &Connection,
) -> Result<Page<ExpenseRow>, Error> {
    get_expenses_page(&ExpenseFilter::Type(type_name.to_owned()), page, connection)
}

/// Retrieve one page of the expenses dated within `year_month` whose
/// expense type is named `type_name`.
pub fn get_expenses_by_year_month_and_type(
    year_month: YearMonth,
    type_name: &str,
    page: PageRequest,
    connection: &Connection,
) -> Result<Page<ExpenseRow>, Error> {
    get_expenses_page(
        &ExpenseFilter::YearMonthAndType(year_month, type_name.to_owned()),
        page,
        connection,
    )
}

/// The exact sum of the expense amounts, zero if there are no expenses.
///
/// # Errors
/// Returns an [Error::TotalOverflow] if the sum does not fit in a [Decimal].
pub fn get_total_amount(expenses: &[ExpenseRow]) -> Result<Decimal, Error> {
    expenses.iter().try_fold(Decimal::ZERO, |total, expense| {
        total
            .checked_add(expense.amount)
            .ok_or(Error::TotalOverflow)
    })
}

fn map_row(row: &Row) -> Result<ExpenseRow, rusqlite::Error> {
    let raw_type_name: String = row.get(5)?;

    Ok(ExpenseRow {
        id: row.get(0)?,
        amount: read_amount(row, 1)?,
        date: row.get(2)?,
        description: row.get(3)?,
        expense_type: ExpenseType {
            id: row.get(4)?,
            name: ExpenseTypeName::new_unchecked(&raw_type_name),
        },
    })
}
