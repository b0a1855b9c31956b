//! Defines the endpoint for listing transactions a page at a time.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

use crate::{
    AppState, Error,
    pagination::Pagination,
    response::ApiResponse,
    transaction::{
        core::{count_transactions, query_transactions},
        query::{ListTransactionsParams, parse_list_params},
    },
};

/// A route handler for listing transactions.
///
/// Supports the query parameters `page`, `limit`, `sort` (e.g. "-date"),
/// `category` and `type`.
pub async fn list_transactions_endpoint(
    State(state): State<AppState>,
    Query(params): Query<ListTransactionsParams>,
) -> Result<impl IntoResponse, Error> {
    let (query, page_request) = parse_list_params(params, &state.pagination_config)?;

    let connection = state.connection()?;
    let transactions = query_transactions(&query, &connection)?;
    let total_items = count_transactions(&query.filter, &connection)?;

    Ok(ApiResponse::data(transactions).with_pagination(Pagination::new(page_request, total_items)))
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Query, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use serde_json::json;

    use crate::{
        test_utils::{must_create_test_state, parse_json_body},
        transaction::{
            Category, Transaction, TransactionType, create_transaction,
            list_transactions_endpoint, query::ListTransactionsParams,
        },
    };

    #[tokio::test]
    async fn returns_page_with_pagination_metadata() {
        let state = must_create_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            for i in 1..=12 {
                create_transaction(
                    Transaction::build(
                        &format!("Item {i}"),
                        i as f64,
                        Category::Shopping,
                        TransactionType::Expense,
                    ),
                    &connection,
                )
                .unwrap();
            }
        }

        let response = list_transactions_endpoint(
            State(state),
            Query(ListTransactionsParams {
                page: Some("2".to_owned()),
                limit: Some("5".to_owned()),
                sort: Some("amount".to_owned()),
                ..Default::default()
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(
            body["pagination"],
            json!({
                "currentPage": 2,
                "totalPages": 3,
                "totalItems": 12,
                "itemsPerPage": 5,
            })
        );
        let amounts: Vec<f64> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|transaction| transaction["amount"].as_f64().unwrap())
            .collect();
        assert_eq!(amounts, [6.0, 7.0, 8.0, 9.0, 10.0]);
    }

    #[tokio::test]
    async fn invalid_params_return_bad_request() {
        let state = must_create_test_state();

        let response = list_transactions_endpoint(
            State(state),
            Query(ListTransactionsParams {
                category: Some("Pets".to_owned()),
                ..Default::default()
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = parse_json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"][0]["field"], "category");
    }
}
