//! Short code resolution for the redirect path.

use std::sync::Arc;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::is_well_formed_code;
use serde_json::json;
use tracing::debug;

/// Resolves short codes to their target URLs.
///
/// Reads go straight to the store, so a link is resolvable as soon as the
/// insert that created it has returned, and stops resolving as soon as its
/// delete has returned.
pub struct RedirectResolver<R: LinkRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: LinkRepository + ?Sized> RedirectResolver<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns the stored URL for `code`, byte-for-byte as it was submitted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown or malformed codes. Malformed
    /// codes are rejected without a store round-trip.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if !is_well_formed_code(code) {
            metrics::counter!("redirects_total", "outcome" => "not_found").increment(1);
            return Err(not_found(code));
        }

        match self.repository.get_by_code(code).await? {
            Some(link) => {
                metrics::counter!("redirects_total", "outcome" => "found").increment(1);
                debug!(code, "Resolved short code");
                Ok(link.original_url)
            }
            None => {
                metrics::counter!("redirects_total", "outcome" => "not_found").increment(1);
                debug!(code, "Unknown short code");
                Err(not_found(code))
            }
        }
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}
