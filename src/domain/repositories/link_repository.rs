//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage contract for short links.
///
/// The store exclusively owns persisted records. Every mutating call is durable
/// (for durable backends) before it returns `Ok`, and a successful `insert` is
/// visible to every later `get_by_code`.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Atomically inserts a link if its short code is free.
    ///
    /// Check and insert are one operation: two concurrent calls with the same
    /// code can never both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeConflict`] if the code belongs to a live record.
    /// Returns [`AppError::Unavailable`] / [`AppError::Internal`] on store errors.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortLink))` if found
    /// - `Ok(None)` if not found
    async fn get_by_code(&self, short_code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Lists an owner's links, most recent first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError>;

    /// Deletes a link on behalf of `requesting_owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    /// Returns [`AppError::Forbidden`] if the requester does not own it; the
    /// record is left untouched.
    async fn delete(
        &self,
        short_code: &str,
        requesting_owner_id: Option<String>,
    ) -> Result<(), AppError>;

    /// Returns the next value of the store's code sequence.
    ///
    /// Values are unique across concurrent callers.
    async fn next_sequence(&self) -> Result<u64, AppError>;

    /// Verifies the store is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
