//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /shorten`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/a/very/long/path",
///   "owner_id": "user-42",   // optional, also accepted as ownerId / discordId
///   "custom_code": "my-link" // optional
/// }
/// ```
///
/// # Response
///
/// ```json
/// { "code": "b7F3x2Q", "short_url": "https://sho.rt/b7F3x2Q" }
/// ```
///
/// `short_url` is omitted when no public base URL is configured.
///
/// # Cancellation
///
/// The shortening call runs on its own task, so a client that disconnects
/// mid-request cannot interrupt an insert. A link created that way is still
/// listed under its owner.
///
/// # Errors
///
/// - 400 `invalid_url` / `validation_error`
/// - 409 `code_conflict` when a custom code is taken
/// - 503 `generation_exhausted` / `store_unavailable`
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    payload.validate()?;

    let ShortenRequest {
        url,
        owner_id,
        custom_code,
    } = payload;
    let service = state.link_service.clone();

    let link = tokio::spawn(async move {
        match custom_code {
            Some(code) => service.shorten_with_code(&url, &code, owner_id).await,
            None => service.shorten(&url, owner_id).await,
        }
    })
    .await
    .map_err(|e| AppError::internal("Shortening task failed", json!({ "reason": e.to_string() })))??;

    Ok(Json(ShortenResponse {
        short_url: state.short_url(&link.short_code),
        code: link.short_code,
    }))
}
