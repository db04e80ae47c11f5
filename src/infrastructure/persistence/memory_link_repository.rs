//! Process-local link repository.
//!
//! Backed by a sharded [`DashMap`] keyed by short code. Inserts and deletes go
//! through the entry API, so the uniqueness check and the write happen under the
//! same shard lock. Nothing here is awaited while a shard is held.
//!
//! Records live only as long as the process: use it for development and tests,
//! not for deployments that need durable links.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    links: DashMap<String, ShortLink>,
    next_id: AtomicI64,
    sequence: AtomicU64,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        match self.links.entry(new_link.short_code) {
            Entry::Occupied(entry) => Err(AppError::code_conflict(
                "Short code already exists",
                json!({ "code": entry.key() }),
            )),
            Entry::Vacant(entry) => {
                let link = ShortLink::new(
                    self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
                    entry.key().clone(),
                    new_link.original_url,
                    new_link.owner_id,
                    Utc::now(),
                );
                entry.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn get_by_code(&self, short_code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.get(short_code).map(|link| link.value().clone()))
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError> {
        let mut links: Vec<ShortLink> = self
            .links
            .iter()
            .filter(|link| link.owner_id.as_deref() == Some(owner_id))
            .map(|link| link.value().clone())
            .collect();

        links.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(links)
    }

    async fn delete(
        &self,
        short_code: &str,
        requesting_owner_id: Option<String>,
    ) -> Result<(), AppError> {
        match self.links.entry(short_code.to_string()) {
            Entry::Vacant(_) => Err(AppError::not_found(
                "Short link not found",
                json!({ "code": short_code }),
            )),
            Entry::Occupied(entry) if !entry.get().is_owned_by(requesting_owner_id.as_deref()) => {
                Err(AppError::forbidden(
                    "Only the owner can delete this short link",
                    json!({ "code": short_code }),
                ))
            }
            Entry::Occupied(entry) => {
                entry.remove();
                Ok(())
            }
        }
    }

    async fn next_sequence(&self) -> Result<u64, AppError> {
        Ok(self.sequence.fetch_add(1, Ordering::Relaxed) + 1)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
