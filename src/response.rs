//! The JSON envelopes shared by every API response.
//!
//! Successful responses look like `{"success": true, "data": ...}` and failed
//! responses look like `{"success": false, "message": ...}` or, for rejected
//! input, `{"success": false, "errors": [{"field": ..., "message": ...}]}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{pagination::Pagination, transaction::FieldError};

/// A successful response body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<Pagination>,
}

impl<T> ApiResponse<T> {
    /// A response carrying `data`.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    /// Attach a human readable message.
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }

    /// Attach pagination metadata for a list of items.
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }
}

impl ApiResponse<()> {
    /// A response with only a message and no data.
    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.to_owned()),
            pagination: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// A failed response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    /// An error described by a single message.
    pub fn message(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_owned()),
            errors: None,
        }
    }

    /// An error describing every invalid field in a request.
    pub fn field_errors(errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: None,
            errors: Some(errors),
        }
    }

    /// Pair the body with `status`.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{pagination::Pagination, transaction::FieldError};

    use super::{ApiResponse, ErrorResponse};

    #[test]
    fn data_response_omits_empty_fields() {
        let got = serde_json::to_value(ApiResponse::data(42)).unwrap();

        assert_eq!(got, json!({"success": true, "data": 42}));
    }

    #[test]
    fn data_response_with_message_and_pagination() {
        let response = ApiResponse::data(vec![1, 2])
            .with_message("here you go")
            .with_pagination(Pagination {
                current_page: 1,
                total_pages: 1,
                total_items: 2,
                items_per_page: 10,
            });

        let got = serde_json::to_value(response).unwrap();

        assert_eq!(
            got,
            json!({
                "success": true,
                "data": [1, 2],
                "message": "here you go",
                "pagination": {
                    "currentPage": 1,
                    "totalPages": 1,
                    "totalItems": 2,
                    "itemsPerPage": 10,
                },
            })
        );
    }

    #[test]
    fn message_only_response() {
        let got = serde_json::to_value(ApiResponse::message("done")).unwrap();

        assert_eq!(got, json!({"success": true, "message": "done"}));
    }

    #[test]
    fn error_responses() {
        assert_eq!(
            serde_json::to_value(ErrorResponse::message("nope")).unwrap(),
            json!({"success": false, "message": "nope"})
        );
        assert_eq!(
            serde_json::to_value(ErrorResponse::field_errors(vec![FieldError::new(
                "amount",
                "bad amount"
            )]))
            .unwrap(),
            json!({
                "success": false,
                "errors": [{"field": "amount", "message": "bad amount"}],
            })
        );
    }
}
