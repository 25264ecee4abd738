use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Date, Duration, OffsetDateTime};

use expense_tracker::{ExpenseDraft, ExpenseTypeName, create_expense_type, initialize_db, save_expense};

/// A utility for creating a test database for the expense tracker.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of expenses to create.
    #[arg(long, short, default_value_t = 60)]
    count: u32,
}

const EXPENSE_TYPES: [(&str, &[&str]); 4] = [
    ("Food", &["Groceries", "Lunch", "Coffee", "Takeaway"]),
    ("Rent", &["Weekly rent"]),
    ("Transport", &["Bus fare", "Petrol", "Parking"]),
    ("Entertainment", &["Movie tickets", "Concert", "Board game"]),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating expense types...");
    let mut expense_types = Vec::with_capacity(EXPENSE_TYPES.len());
    for (name, descriptions) in EXPENSE_TYPES {
        let expense_type = create_expense_type(ExpenseTypeName::new(name)?, &conn)?;
        expense_types.push((expense_type, descriptions));
    }

    println!("Creating {} expenses...", args.count);
    let today = OffsetDateTime::now_utc().date();
    for i in 0..args.count {
        let index = i as usize;
        let (expense_type, descriptions) = &expense_types[index % expense_types.len()];
        let description = descriptions[index % descriptions.len()];
        let date: Date = today - Duration::days(i64::from(i) * 3);
        // Cents cycle through 0..97 so that totals exercise decimal addition.
        let amount = Decimal::new(i64::from(i % 50) * 250 + i64::from(i % 97) + 100, 2);

        save_expense(
            ExpenseDraft {
                id: None,
                amount,
                date,
                expense_type_id: expense_type.id,
                description: description.to_owned(),
            },
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
