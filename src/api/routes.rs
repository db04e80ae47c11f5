//! API route configuration.

use crate::api::handlers::{
    delete_link_handler, link_details_handler, owner_links_handler, redirect_handler,
    shorten_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link routes. No authentication: ownership is an explicit `owner_id`.
///
/// # Endpoints
///
/// - `POST   /shorten`           - Create a short link
/// - `GET    /user/{owner_id}`   - List an owner's links
/// - `GET    /links/{code}`      - Link details
/// - `GET    /{code}`            - Redirect
/// - `DELETE /{code}`            - Delete (owner only)
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_handler))
        .route("/user/{owner_id}", get(owner_links_handler))
        .route("/links/{code}", get(link_details_handler))
        .route(
            "/{code}",
            get(redirect_handler).delete(delete_link_handler),
        )
}
