use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};

use crate::{
    AppState, Error,
    database_id::TransactionId,
    response::ApiResponse,
    transaction::{TransactionPayload, core::update_transaction, validate_transaction},
};

/// A route handler for replacing the fields of an existing transaction.
///
/// The ID is checked before the body, so a malformed ID is reported even if
/// the body is also invalid. If the body omits `date`, the stored date is kept.
pub async fn edit_transaction_endpoint(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let transaction_id: TransactionId = transaction_id.parse()?;
    let Json(payload) = payload?;
    let builder = validate_transaction(payload)?;

    let connection = state.connection()?;
    let transaction = update_transaction(transaction_id, builder, &connection)?;
    tracing::info!("Updated transaction {transaction_id}");

    Ok(ApiResponse::data(transaction).with_message("Transaction updated successfully"))
}

#[cfg(test)]
mod tests {
    use axum::{
        Json,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        database_id::TransactionId,
        test_utils::{must_create_test_state, parse_json_body},
        transaction::{
            Category, Transaction, TransactionPayload, TransactionType, core::get_transaction,
            create_transaction, edit_transaction_endpoint,
        },
    };

    fn payload(value: serde_json::Value) -> TransactionPayload {
        serde_json::from_value(value).expect("could not build test payload")
    }

    #[tokio::test]
    async fn can_update_transaction() {
        let state = must_create_test_state();
        let original = create_transaction(
            Transaction::build("Rent", 100.0, Category::Bills, TransactionType::Expense)
                .date(datetime!(2024-01-01 0:00 UTC)),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(original.id.to_string()),
            Ok(Json(payload(json!({
                "title": "Rent (February)",
                "amount": 150,
                "category": "Bills",
                "type": "expense",
                "description": "Price went up",
            })))),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["message"], "Transaction updated successfully");

        let got = get_transaction(original.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got.title, "Rent (February)");
        assert_eq!(got.amount, 150.0);
        assert_eq!(got.description.as_deref(), Some("Price went up"));
        assert_eq!(got.date, original.date);
        assert_eq!(got.created_at, original.created_at);
    }

    #[tokio::test]
    async fn missing_transaction_returns_not_found() {
        let state = must_create_test_state();

        let response = edit_transaction_endpoint(
            State(state),
            Path(TransactionId::new().to_string()),
            Ok(Json(payload(json!({
                "title": "Ghost",
                "amount": 1,
                "category": "Other",
                "type": "expense",
            })))),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_payload_leaves_transaction_unchanged() {
        let state = must_create_test_state();
        let original = create_transaction(
            Transaction::build("Rent", 100.0, Category::Bills, TransactionType::Expense),
            &state.db_connection.lock().unwrap(),
        )
        .unwrap();

        let response = edit_transaction_endpoint(
            State(state.clone()),
            Path(original.id.to_string()),
            Ok(Json(payload(json!({
                "title": "Rent",
                "amount": 100,
                "category": "Housing",
                "type": "expense",
            })))),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let got = get_transaction(original.id, &state.db_connection.lock().unwrap()).unwrap();
        assert_eq!(got, original);
    }

    #[tokio::test]
    async fn malformed_id_is_reported_before_payload() {
        let state = must_create_test_state();

        let response = edit_transaction_endpoint(
            State(state),
            Path("abc".to_owned()),
            Ok(Json(TransactionPayload::default())),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        assert_eq!(body["message"], "Invalid transaction ID");
    }
}
