use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    AppState, Error, database_id::TransactionId, response::ApiResponse,
    transaction::core::delete_transaction,
};

/// A route handler for deleting a transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let transaction_id: TransactionId = transaction_id.parse()?;

    let connection = state.connection()?;
    delete_transaction(transaction_id, &connection)?;
    tracing::info!("Deleted transaction {transaction_id}");

    Ok(ApiResponse::message("Transaction deleted successfully"))
}
