use axum::{extract::State, response::IntoResponse};

use crate::{AppState, Error, response::ApiResponse, transaction::summary::get_summary};

/// A route handler for the income, expense and balance totals and the
/// per-category breakdown over all transactions.
pub async fn get_summary_endpoint(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let connection = state.connection()?;
    let summary = get_summary(&connection)?;

    Ok(ApiResponse::data(summary))
}
