//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{LinkService, RedirectResolver, ShortenSettings};
use crate::domain::repositories::LinkRepository;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService<dyn LinkRepository>>,
    pub redirect_resolver: Arc<RedirectResolver<dyn LinkRepository>>,
    pub repository: Arc<dyn LinkRepository>,
    /// Base for absolute short URLs, without trailing slash.
    pub public_base_url: Option<String>,
}

impl AppState {
    /// Wires the services around a single store.
    pub fn new(
        repository: Arc<dyn LinkRepository>,
        settings: ShortenSettings,
        public_base_url: Option<String>,
    ) -> Self {
        Self {
            link_service: Arc::new(LinkService::new(repository.clone(), settings)),
            redirect_resolver: Arc::new(RedirectResolver::new(repository.clone())),
            repository,
            public_base_url,
        }
    }

    /// Absolute short URL for `code`, if a public base URL is configured.
    pub fn short_url(&self, code: &str) -> Option<String> {
        self.public_base_url
            .as_deref()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), code))
    }
}
