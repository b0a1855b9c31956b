//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState, Error,
    response::ApiResponse,
    transaction::{TransactionPayload, core::create_transaction, validate_transaction},
};

/// A route handler for creating a new transaction.
///
/// Responds with 201 and the stored transaction, or 400 listing every invalid
/// field.
pub async fn create_transaction_endpoint(
    State(state): State<AppState>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(payload) = payload?;
    let builder = validate_transaction(payload)?;

    let connection = state.connection()?;
    let transaction = create_transaction(builder, &connection)?;
    tracing::info!("Created transaction {}", transaction.id);

    Ok((
        StatusCode::CREATED,
        ApiResponse::data(transaction).with_message("Transaction created successfully"),
    ))
}
