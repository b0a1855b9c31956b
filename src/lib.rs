//! A REST API for tracking personal income and expenses.
//!
//! Transactions are stored in SQLite and served as JSON. Alongside the usual
//! create, read, update and delete operations, the API supports filtered and
//! paginated listing and an aggregate summary of totals per category.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod database_id;
mod db;
mod endpoints;
mod format;
mod logging;
mod not_found;
mod pagination;
mod response;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use format::{
    calculate_percentage, category_color, category_icon, format_currency, format_date,
    format_date_for_input, truncate_text,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::{PaginationConfig, PaginationConfigError};
pub use routing::build_router;
pub use transaction::{
    Category, CategoryTotal, FieldError, Summary, Totals, Transaction, TransactionBuilder,
    TransactionType, create_transaction, get_all_transactions, get_summary, sample_transactions,
    seed_transactions, summarize,
};

use crate::response::ErrorResponse;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// One or more fields of a transaction failed validation.
    ///
    /// Every violation is reported, not just the first one found.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The string could not be parsed as a transaction ID.
    #[error("\"{0}\" is not a valid transaction ID")]
    InvalidTransactionId(String),

    /// The request body could not be parsed as JSON.
    ///
    /// Holds the rejection text produced by axum.
    #[error("invalid JSON body: {0}")]
    InvalidJson(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the transaction has not been deleted.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidJson(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::Validation(errors) => {
                ErrorResponse::field_errors(errors).into_response_with(StatusCode::BAD_REQUEST)
            }
            Error::InvalidTransactionId(id) => {
                tracing::debug!("Rejected malformed transaction ID {id:?}");
                ErrorResponse::message("Invalid transaction ID")
                    .into_response_with(StatusCode::BAD_REQUEST)
            }
            Error::InvalidJson(reason) => {
                ErrorResponse::message(&reason).into_response_with(StatusCode::BAD_REQUEST)
            }
            Error::NotFound => ErrorResponse::message("Transaction not found")
                .into_response_with(StatusCode::NOT_FOUND),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                ErrorResponse::message("Something went wrong, please try again later")
                    .into_response_with(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
