#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::json;
use shortlink::application::services::ShortenSettings;
use shortlink::domain::entities::{NewShortLink, ShortLink};
use shortlink::domain::repositories::LinkRepository;
use shortlink::error::AppError;
use shortlink::infrastructure::persistence::InMemoryLinkRepository;
use shortlink::routes::router;
use shortlink::state::AppState;
use std::sync::Arc;

pub const BASE_URL: &str = "https://sho.rt";

/// State over a fresh in-memory store, with a public base URL.
pub fn create_test_state() -> (AppState, Arc<InMemoryLinkRepository>) {
    create_test_state_with(ShortenSettings::default(), Some(BASE_URL))
}

pub fn create_test_state_with(
    settings: ShortenSettings,
    public_base_url: Option<&str>,
) -> (AppState, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let state = AppState::new(repo.clone(), settings, public_base_url.map(str::to_string));
    (state, repo)
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

pub async fn create_test_link(
    repo: &InMemoryLinkRepository,
    code: &str,
    url: &str,
    owner: Option<&str>,
) -> ShortLink {
    repo.insert(NewShortLink {
        short_code: code.to_string(),
        original_url: url.to_string(),
        owner_id: owner.map(str::to_string),
    })
    .await
    .unwrap()
}

/// Store whose code space is permanently full.
pub struct SaturatedRepository;

#[async_trait]
impl LinkRepository for SaturatedRepository {
    async fn insert(&self, _new_link: NewShortLink) -> Result<ShortLink, AppError> {
        Err(AppError::code_conflict("Short code already exists", json!({})))
    }

    async fn get_by_code(&self, _short_code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(None)
    }

    async fn list_by_owner(&self, _owner_id: &str) -> Result<Vec<ShortLink>, AppError> {
        Ok(Vec::new())
    }

    async fn delete(&self, short_code: &str, _owner: Option<String>) -> Result<(), AppError> {
        Err(AppError::not_found(
            "Short link not found",
            json!({ "code": short_code }),
        ))
    }

    async fn next_sequence(&self) -> Result<u64, AppError> {
        Ok(1)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Store that cannot be reached.
pub struct UnavailableRepository;

fn unavailable() -> AppError {
    AppError::unavailable("Link store unavailable", json!({ "reason": "connection refused" }))
}

#[async_trait]
impl LinkRepository for UnavailableRepository {
    async fn insert(&self, _new_link: NewShortLink) -> Result<ShortLink, AppError> {
        Err(unavailable())
    }

    async fn get_by_code(&self, _short_code: &str) -> Result<Option<ShortLink>, AppError> {
        Err(unavailable())
    }

    async fn list_by_owner(&self, _owner_id: &str) -> Result<Vec<ShortLink>, AppError> {
        Err(unavailable())
    }

    async fn delete(&self, _short_code: &str, _owner: Option<String>) -> Result<(), AppError> {
        Err(unavailable())
    }

    async fn next_sequence(&self) -> Result<u64, AppError> {
        Err(unavailable())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(unavailable())
    }
}

pub fn state_over(repo: Arc<dyn LinkRepository>) -> AppState {
    AppState::new(repo, ShortenSettings::default(), None)
}
