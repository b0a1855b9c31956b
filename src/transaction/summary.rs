//! Income, expense and balance totals over every stored transaction.
//!
//! Totals are recomputed from the whole collection on each request.

use std::collections::HashMap;

use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    transaction::{Category, Transaction, TransactionType, core::get_count},
};

/// Income and expense totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Totals {
    /// The sum of all income amounts.
    pub income: f64,
    /// The sum of all expense amounts.
    pub expenses: f64,
    /// Always `income - expenses`.
    pub balance: f64,
}

impl Totals {
    fn new(income: f64, expenses: f64) -> Self {
        Self {
            income,
            expenses,
            balance: income - expenses,
        }
    }
}

/// The total and number of transactions in one category, regardless of type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category being totalled.
    pub category: Category,
    /// The sum of the amounts in the category.
    pub total: f64,
    /// The number of transactions in the category.
    pub count: u64,
}

/// The response body of the summary endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Totals over every transaction.
    pub summary: Totals,
    /// One entry per category that has transactions, largest total first.
    pub category_breakdown: Vec<CategoryTotal>,
}

/// Aggregate `transactions` in memory.
///
/// Gives the same result as [get_summary] over the same transactions, up to
/// floating point rounding.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    let mut income = 0.0;
    let mut expenses = 0.0;
    let mut by_category: HashMap<Category, (f64, u64)> = HashMap::new();

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => income += transaction.amount,
            TransactionType::Expense => expenses += transaction.amount,
        }

        let (total, count) = by_category.entry(transaction.category).or_default();
        *total += transaction.amount;
        *count += 1;
    }

    let mut category_breakdown: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(category, (total, count))| CategoryTotal {
            category,
            total,
            count,
        })
        .collect();
    sort_breakdown(&mut category_breakdown);

    Summary {
        summary: Totals::new(income, expenses),
        category_breakdown,
    }
}

/// Largest total first, ties broken by category name.
fn sort_breakdown(breakdown: &mut [CategoryTotal]) {
    breakdown.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
}

/// Aggregate every transaction in the database.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_summary(connection: &Connection) -> Result<Summary, Error> {
    let mut income = 0.0;
    let mut expenses = 0.0;

    let type_totals = connection
        .prepare("SELECT type, TOTAL(amount) FROM \"transaction\" GROUP BY type")?
        .query_map([], |row| {
            Ok((row.get::<_, TransactionType>(0)?, row.get::<_, f64>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    for (transaction_type, total) in type_totals {
        match transaction_type {
            TransactionType::Income => income = total,
            TransactionType::Expense => expenses = total,
        }
    }

    let mut category_breakdown = connection
        .prepare(
            "SELECT category, TOTAL(amount), COUNT(id) FROM \"transaction\" GROUP BY category",
        )?
        .query_map([], |row| {
            Ok(CategoryTotal {
                category: row.get(0)?,
                total: row.get(1)?,
                count: get_count(row, 2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    sort_breakdown(&mut category_breakdown);

    Ok(Summary {
        summary: Totals::new(income, expenses),
        category_breakdown,
    })
}
