#![allow(missing_docs)]

use axum::response::Response;
use rusqlite::Connection;
use serde_json::Value;

use crate::{AppState, PaginationConfig};

/// An app state backed by a fresh in-memory database.
pub(crate) fn must_create_test_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory database connection");

    AppState::new(connection, PaginationConfig::default())
        .expect("Could not initialize test app state")
}

pub(crate) async fn parse_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Could not read response body");

    serde_json::from_slice(&body).expect("Response body is not valid JSON")
}
