use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    AppState, Error, database_id::TransactionId, response::ApiResponse,
    transaction::core::get_transaction,
};

/// A route handler for getting a single transaction by its ID.
pub async fn get_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let transaction_id: TransactionId = transaction_id.parse()?;

    let connection = state.connection()?;
    let transaction = get_transaction(transaction_id, &connection)?;

    Ok(ApiResponse::data(transaction))
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        database_id::TransactionId,
        test_utils::{must_create_test_state, parse_json_body},
        transaction::{
            Category, Transaction, TransactionType, create_transaction, get_transaction_endpoint,
        },
    };

    #[tokio::test]
    async fn returns_transaction() {
        let state = must_create_test_state();
        let transaction = create_transaction(
            Transaction::build("Bus Pass", 60.0, Category::Transport, TransactionType::Expense),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response =
            get_transaction_endpoint(State(state), Path(transaction.id.to_string()))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["data"], serde_json::to_value(&transaction).unwrap());
    }

    #[tokio::test]
    async fn missing_transaction_returns_not_found() {
        let state = must_create_test_state();

        let response =
            get_transaction_endpoint(State(state), Path(TransactionId::new().to_string()))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = parse_json_body(response).await;
        assert_eq!(body["message"], "Transaction not found");
    }

    #[tokio::test]
    async fn malformed_id_returns_bad_request() {
        let state = must_create_test_state();

        let response = get_transaction_endpoint(State(state), Path("12345".to_owned()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        assert_eq!(body["message"], "Invalid transaction ID");
    }
}
