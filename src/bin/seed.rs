use std::error::Error;

use clap::Parser;
use rusqlite::Connection;

use expense_tracker::{
    calculate_percentage, category_icon, format_currency, initialize_db, seed_transactions,
    summarize,
};

/// A utility for filling the expense tracker database with sample transactions.
///
/// Any existing transactions are removed first.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    println!("Opening database at {:?}", args.db_path);
    let conn = Connection::open(&args.db_path)?;

    initialize_db(&conn)?;

    println!("Seeding sample transactions...");
    let transactions = seed_transactions(&conn)?;
    println!("Inserted {} transactions.", transactions.len());

    let summary = summarize(&transactions);
    let totals = summary.summary;

    println!();
    println!("Income:   {:>12}", format_currency(totals.income));
    println!("Expenses: {:>12}", format_currency(totals.expenses));
    println!("Balance:  {:>12}", format_currency(totals.balance));
    println!();

    let grand_total = totals.income + totals.expenses;
    for category_total in &summary.category_breakdown {
        println!(
            "{} {:<14} {:>12} {:>4}% ({} transactions)",
            category_icon(category_total.category),
            category_total.category,
            format_currency(category_total.total),
            calculate_percentage(category_total.total, grand_total),
            category_total.count,
        );
    }

    println!("Success!");

    Ok(())
}
