//! Handlers for per-owner listing, link lookup and deletion.

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::api::dto::link::{DeleteQuery, DeleteResponse, LinkDetails, OwnerLinkItem};
use crate::error::AppError;
use crate::state::AppState;

/// Lists an owner's links, most recent first.
///
/// # Endpoint
///
/// `GET /user/{owner_id}`
///
/// An owner without links gets an empty array, not a 404.
pub async fn owner_links_handler(
    Path(owner_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<OwnerLinkItem>>, AppError> {
    let links = state.link_service.list_by_owner(&owner_id).await?;

    Ok(Json(links.into_iter().map(OwnerLinkItem::from).collect()))
}

/// Returns the stored record for a short code.
///
/// # Endpoint
///
/// `GET /links/{code}`
pub async fn link_details_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<LinkDetails>, AppError> {
    let link = state.link_service.get_link(&code).await?;
    let short_url = state.short_url(&link.short_code);

    Ok(Json(LinkDetails::new(link, short_url)))
}

/// Deletes a link on behalf of its owner.
///
/// # Endpoint
///
/// `DELETE /{code}?owner_id=...`
///
/// Omitting `owner_id` acts as the anonymous requester, which can only delete
/// anonymous links.
///
/// # Errors
///
/// - 404 if the code does not exist
/// - 403 if the requester is not the owner (the link is kept)
pub async fn delete_link_handler(
    Path(code): Path<String>,
    Query(query): Query<DeleteQuery>,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.link_service.delete_link(&code, query.owner_id).await?;

    Ok(Json(DeleteResponse {
        message: format!("Short link '{code}' deleted"),
    }))
}
