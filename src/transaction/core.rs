//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row, ToSql, params, params_from_iter,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Type, Value, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    database_id::TransactionId,
    transaction::query::{TransactionFilter, TransactionQuery},
};

// ============================================================================
// MODELS
// ============================================================================

/// What a transaction was spent on or earned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Groceries, restaurants and coffee.
    Food,
    /// Fuel, fares and rides.
    Transport,
    /// Streaming, movies and outings.
    Entertainment,
    /// Clothes and other purchases.
    Shopping,
    /// Utilities and other recurring bills.
    Bills,
    /// Doctor visits and medicine.
    Healthcare,
    /// Courses and books.
    Education,
    /// Anything else, including most income.
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Bills,
        Category::Healthcare,
        Category::Education,
        Category::Other,
    ];

    /// The name used for this category in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Shopping => "Shopping",
            Category::Bills => "Bills",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }

    /// Look up a category by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == name)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The name used for this type in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Look up a type by its exact name, "income" or "expense".
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

macro_rules! impl_sql_text_enum {
    ($type:ty) => {
        impl ToSql for $type {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $type {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let text = value.as_str()?;

                <$type>::from_name(text).ok_or_else(|| {
                    FromSqlError::Other(format!("unknown {} \"{text}\"", stringify!($type)).into())
                })
            }
        }
    };
}

impl_sql_text_enum!(Category);
impl_sql_text_enum!(TransactionType);

/// A single recorded income or expense event.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short name for the transaction, e.g. "Coffee".
    pub title: String,
    /// The amount of money spent or earned. Never negative.
    pub amount: f64,
    /// What the money was spent on or earned from.
    pub category: Category,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// Optional free text about the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the transaction was first stored.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last stored.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        title: &str,
        amount: f64,
        category: Category,
        transaction_type: TransactionType,
    ) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            amount,
            category,
            transaction_type,
            date: None,
            description: None,
        }
    }
}

/// The mutable fields of a [Transaction].
///
/// Builders are normally produced by
/// [validate_transaction](crate::transaction::validate_transaction), which
/// guarantees the field constraints. Building one by hand skips validation,
/// although the database still rejects negative amounts.
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Trimmed, 1 to 50 characters.
    pub title: String,
    /// Finite and non-negative.
    pub amount: f64,
    /// What the money was spent on or earned from.
    pub category: Category,
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,
    /// When the transaction happened.
    ///
    /// `None` means "now" on creation and "keep the stored date" on update.
    pub date: Option<OffsetDateTime>,
    /// Trimmed, at most 200 characters, never empty.
    pub description: Option<String>,
}

impl TransactionBuilder {
    /// Set the date of the transaction.
    pub fn date(mut self, date: OffsetDateTime) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the description of the transaction.
    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }
}

/// The current time in UTC, truncated to whole milliseconds so that stored
/// timestamps survive a round trip through JSON unchanged.
pub(crate) fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    let millisecond = now.millisecond();

    now.replace_millisecond(millisecond).unwrap_or(now)
}

/// Dates are stored in UTC so that text comparison in SQL sorts chronologically.
fn to_utc(date: OffsetDateTime) -> OffsetDateTime {
    date.to_offset(UtcOffset::UTC)
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

const TRANSACTION_COLUMNS: &str =
    "id, title, amount, category, type, date, description, created_at, updated_at";

/// Create a new transaction in the database from a builder.
///
/// The store generates the ID and sets both timestamps to the current time.
/// If `builder.date` is `None`, the transaction date is also the current time.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let now = now_utc();
    let date = builder.date.map(to_utc).unwrap_or(now);

    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\" ({TRANSACTION_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                TransactionId::new(),
                builder.title,
                builder.amount,
                builder.category,
                builder.transaction_type,
                date,
                builder.description,
                now,
                now,
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Create many transactions in a single database transaction.
///
/// Either every transaction is stored or none are. If `connection` is already
/// inside a transaction, the inserts join it and are committed or rolled back
/// with the rest of the caller's work.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn insert_transactions(
    builders: Vec<TransactionBuilder>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    // SQLite does not support nested BEGIN.
    if !connection.is_autocommit() {
        return create_each(builders, connection);
    }

    let tx = connection.unchecked_transaction()?;
    let transactions = create_each(builders, &tx)?;
    tx.commit()?;

    Ok(transactions)
}

fn create_each(
    builders: Vec<TransactionBuilder>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    builders
        .into_iter()
        .map(|builder| create_transaction(builder, connection))
        .collect()
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" WHERE id = :id"
        ))?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve a page of transactions matching `query`.
///
/// Ties on the sort field are broken by creation time and then ID so that
/// paging through results is stable.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn query_transactions(
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let (where_clause, parameters) = build_where_clause(&query.filter);
    let direction = query.sort.order.as_sql();

    let query_string = format!(
        "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\"{where_clause} \
        ORDER BY {} {direction}, created_at {direction}, id ASC \
        LIMIT {} OFFSET {}",
        query.sort.field.column(),
        query.limit,
        query.offset,
    );

    connection
        .prepare(&query_string)?
        .query_map(params_from_iter(parameters.iter()), map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Count the transactions matching `filter`.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn count_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<u64, Error> {
    let (where_clause, parameters) = build_where_clause(filter);

    connection
        .query_row(
            &format!("SELECT COUNT(id) FROM \"transaction\"{where_clause}"),
            params_from_iter(parameters.iter()),
            |row| get_count(row, 0),
        )
        .map_err(Error::from)
}

/// Read the SQL `COUNT` in column `index` as a `u64`.
///
/// SQLite integers are signed, so the value is read as `i64` first.
pub(crate) fn get_count(row: &Row, index: usize) -> Result<u64, rusqlite::Error> {
    let count: i64 = row.get(index)?;

    u64::try_from(count).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(error))
    })
}

fn build_where_clause(filter: &TransactionFilter) -> (String, Vec<Value>) {
    let mut where_clause_parts = vec![];
    let mut parameters = vec![];

    if let Some(category) = filter.category {
        parameters.push(Value::Text(category.as_str().to_owned()));
        where_clause_parts.push(format!("category = ?{}", parameters.len()));
    }

    if let Some(transaction_type) = filter.transaction_type {
        parameters.push(Value::Text(transaction_type.as_str().to_owned()));
        where_clause_parts.push(format!("type = ?{}", parameters.len()));
    }

    if where_clause_parts.is_empty() {
        (String::new(), parameters)
    } else {
        (
            format!(" WHERE {}", where_clause_parts.join(" AND ")),
            parameters,
        )
    }
}

/// Replace the mutable fields of the transaction `id`.
///
/// If `builder.date` is `None` the stored date is kept. The update time is
/// always refreshed.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "UPDATE \"transaction\" SET \
                title = ?1, \
                amount = ?2, \
                category = ?3, \
                type = ?4, \
                date = COALESCE(?5, date), \
                description = ?6, \
                updated_at = ?7 \
            WHERE id = ?8 \
            RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            params![
                builder.title,
                builder.amount,
                builder.category,
                builder.transaction_type,
                builder.date.map(to_utc),
                builder.description,
                now_utc(),
                id,
            ],
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Delete the transaction `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete every transaction, returning how many were removed.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn delete_all_transactions(connection: &Connection) -> Result<usize, Error> {
    connection
        .execute("DELETE FROM \"transaction\"", ())
        .map_err(Error::from)
}

/// Get every stored transaction in the order they were created.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(&format!(
            "SELECT {TRANSACTION_COLUMNS} FROM \"transaction\" ORDER BY created_at ASC, id ASC"
        ))?
        .query_map([], map_transaction_row)?
        .map(|transaction_result| transaction_result.map_err(Error::from))
        .collect()
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id TEXT PRIMARY KEY NOT NULL,
                title TEXT NOT NULL CHECK (length(title) BETWEEN 1 AND 50),
                amount REAL NOT NULL CHECK (amount >= 0),
                category TEXT NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                date TEXT NOT NULL,
                description TEXT CHECK (description IS NULL OR length(description) <= 200),
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date DESC);",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        transaction_type: row.get(4)?,
        date: row.get(5)?,
        description: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod model_tests {
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        database_id::TransactionId,
        transaction::{Category, Transaction, TransactionType},
    };

    #[test]
    fn category_names_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_name(category.as_str()), Some(category));
        }
    }

    #[test]
    fn category_lookup_is_case_sensitive() {
        assert_eq!(Category::from_name("food"), None);
        assert_eq!(Category::from_name("Unknown"), None);
    }

    #[test]
    fn transaction_type_lookup() {
        assert_eq!(
            TransactionType::from_name("income"),
            Some(TransactionType::Income)
        );
        assert_eq!(
            TransactionType::from_name("expense"),
            Some(TransactionType::Expense)
        );
        assert_eq!(TransactionType::from_name("Expense"), None);
    }

    #[test]
    fn serializes_with_camel_case_field_names() {
        let id = TransactionId::new();
        let transaction = Transaction {
            id,
            title: "Coffee".to_owned(),
            amount: 8.5,
            category: Category::Food,
            transaction_type: TransactionType::Expense,
            date: datetime!(2024-01-28 0:00 UTC),
            description: None,
            created_at: datetime!(2024-01-28 8:30 UTC),
            updated_at: datetime!(2024-01-28 8:30 UTC),
        };

        let got = serde_json::to_value(&transaction).unwrap();

        assert_eq!(
            got,
            json!({
                "id": id.to_string(),
                "title": "Coffee",
                "amount": 8.5,
                "category": "Food",
                "type": "expense",
                "date": "2024-01-28T00:00:00Z",
                "createdAt": "2024-01-28T08:30:00Z",
                "updatedAt": "2024-01-28T08:30:00Z",
            })
        );
    }
}
