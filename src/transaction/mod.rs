//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Validation of client submitted transactions
//! - Database functions for storing, querying, and summarizing transactions
//! - The JSON route handlers

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod list_endpoint;
mod query;
mod seed;
mod summary;
mod summary_endpoint;
mod validation;

pub use self::core::{
    Category, Transaction, TransactionBuilder, TransactionType, create_transaction,
    get_all_transactions,
};
pub(crate) use self::core::create_transaction_table;
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
pub use seed::{sample_transactions, seed_transactions};
pub use summary::{CategoryTotal, Summary, Totals, get_summary, summarize};
pub use summary_endpoint::get_summary_endpoint;
pub use validation::{FieldError, TransactionPayload, validate_transaction};
