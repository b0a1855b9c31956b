//! Sample data for demos and manual testing.

use rusqlite::Connection;
use time::{Date, Month, OffsetDateTime, Time};

use crate::{
    Error,
    transaction::{
        Category, Transaction, TransactionBuilder, TransactionType,
        core::{delete_all_transactions, insert_transactions},
    },
};

/// Fifteen transactions spread over the second half of January 2024.
pub fn sample_transactions() -> Vec<TransactionBuilder> {
    use Category::*;
    use TransactionType::*;

    [
        ("Salary", 5000.0, Other, Income, 15, "Monthly salary payment"),
        ("Grocery Shopping", 120.5, Food, Expense, 16, "Weekly groceries from Walmart"),
        ("Gas Station", 45.0, Transport, Expense, 17, "Fuel for car"),
        ("Netflix Subscription", 15.99, Entertainment, Expense, 18, "Monthly streaming service"),
        ("Electric Bill", 89.5, Bills, Expense, 19, "Monthly electricity bill"),
        ("Freelance Project", 800.0, Other, Income, 20, "Web development project payment"),
        ("Restaurant Dinner", 65.0, Food, Expense, 21, "Dinner at Italian restaurant"),
        ("Uber Ride", 25.0, Transport, Expense, 22, "Ride to airport"),
        ("Shopping Mall", 150.0, Shopping, Expense, 23, "New clothes and accessories"),
        ("Doctor Visit", 75.0, Healthcare, Expense, 24, "Annual checkup"),
        ("Online Course", 199.99, Education, Expense, 25, "React development course on Udemy"),
        ("Movie Tickets", 32.0, Entertainment, Expense, 26, "Weekend movie with friends"),
        ("Bonus Payment", 1000.0, Other, Income, 27, "Performance bonus"),
        ("Coffee Shop", 8.5, Food, Expense, 28, "Morning coffee and pastry"),
        ("Bus Pass", 60.0, Transport, Expense, 29, "Monthly public transport pass"),
    ]
    .into_iter()
    .map(|(title, amount, category, transaction_type, day, description)| {
        Transaction::build(title, amount, category, transaction_type)
            .date(january_2024(day))
            .description(description)
    })
    .collect()
}

fn january_2024(day: u8) -> OffsetDateTime {
    Date::from_calendar_date(2024, Month::January, day)
        .map(|date| date.with_time(Time::MIDNIGHT).assume_utc())
        .unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

/// Replace every stored transaction with [sample_transactions].
///
/// The delete and the inserts happen in one database transaction, so a
/// failure leaves the existing data untouched.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn seed_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    let tx = connection.unchecked_transaction()?;

    let removed = delete_all_transactions(&tx)?;
    tracing::debug!("Removed {removed} existing transactions before seeding");

    let transactions = insert_transactions(sample_transactions(), &tx)?;

    tx.commit()?;

    Ok(transactions)
}
