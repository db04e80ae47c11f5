//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::url_validator::to_location_header;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Responses
///
/// - **302 Found** with `Location` set to the stored URL
/// - **404 Not Found** as a plain-text page for unknown or malformed codes
/// - **503** JSON error if the store is unreachable
pub async fn redirect_handler(Path(code): Path<String>, State(state): State<AppState>) -> Response {
    match state.redirect_resolver.resolve(&code).await {
        Ok(original_url) => match to_location_header(&original_url) {
            Some(location) => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
            None => {
                error!(code = %code, "Stored URL cannot be used as a Location header");
                AppError::internal("Stored URL is not redirectable", json!({ "code": code }))
                    .into_response()
            }
        },
        Err(AppError::NotFound { .. }) => (StatusCode::NOT_FOUND, "Not Found").into_response(),
        Err(e) => e.into_response(),
    }
}
