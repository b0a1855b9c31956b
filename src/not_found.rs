use axum::{http::StatusCode, response::Response};

use crate::response::ErrorResponse;

/// The fallback handler for requests that do not match any route.
pub async fn get_404_not_found() -> Response {
    ErrorResponse::message("Route not found").into_response_with(StatusCode::NOT_FOUND)
}
