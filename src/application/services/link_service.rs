//! Short link issuance, lookup and deletion.

use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{
    CodeStrategy, is_reserved, is_well_formed_code, validate_custom_code,
};
use crate::utils::url_validator::validate_url;
use serde_json::json;
use tracing::{debug, info, warn};

/// Longest accepted owner identifier.
pub const MAX_OWNER_ID_LENGTH: usize = 255;

/// Tuning for the code assignment loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortenSettings {
    pub strategy: CodeStrategy,
    /// Upper bound on insert attempts per `shorten` call.
    pub max_attempts: usize,
}

impl Default for ShortenSettings {
    fn default() -> Self {
        Self {
            strategy: CodeStrategy::Random { length: 7 },
            max_attempts: 5,
        }
    }
}

/// Service for creating, listing and deleting short links.
///
/// Code assignment relies on the store's atomic insert: a candidate is proposed,
/// inserted, and on [`AppError::CodeConflict`] a fresh candidate is tried. There is
/// no separate existence check, so two concurrent requests can never both claim
/// the same code.
pub struct LinkService<R: LinkRepository + ?Sized> {
    repository: Arc<R>,
    settings: ShortenSettings,
}

impl<R: LinkRepository + ?Sized> LinkService<R> {
    /// Creates a new link service.
    pub fn new(repository: Arc<R>, settings: ShortenSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub fn settings(&self) -> ShortenSettings {
        self.settings
    }

    /// Shortens `original_url` with a generated code.
    ///
    /// # Algorithm
    ///
    /// 1. Validate the URL (absolute, http/https). Invalid input never reaches the store.
    /// 2. Up to `max_attempts` times: draw a seed, derive a candidate code, skip
    ///    reserved codes, attempt an atomic insert. Conflicts are retried; any
    ///    other outcome is returned as is.
    /// 3. If every attempt collided, fail with `GenerationExhausted`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] for a bad URL, [`AppError::Validation`] for a
    /// bad owner id, [`AppError::GenerationExhausted`] when retries run out, and
    /// store errors unchanged.
    pub async fn shorten(
        &self,
        original_url: &str,
        owner_id: Option<String>,
    ) -> Result<ShortLink, AppError> {
        let original_url = validated_url(original_url)?;
        let owner_id = normalize_owner_id(owner_id)?;
        let ShortenSettings {
            strategy,
            max_attempts,
        } = self.settings;

        let mut collisions = 0usize;

        for attempt in 1..=max_attempts {
            let candidate = strategy.generate_code(self.next_seed().await?);

            if is_reserved(&candidate) {
                debug!(attempt, code = %candidate, "Skipping reserved short code");
                continue;
            }

            let new_link = NewShortLink {
                short_code: candidate.clone(),
                original_url: original_url.clone(),
                owner_id: owner_id.clone(),
            };

            match self.repository.insert(new_link).await {
                Ok(link) => {
                    metrics::counter!("shortlinks_created_total").increment(1);
                    info!(
                        code = %link.short_code,
                        owned = link.owner_id.is_some(),
                        attempt,
                        "Short link created"
                    );
                    return Ok(link);
                }
                Err(AppError::CodeConflict { .. }) => {
                    collisions += 1;
                    metrics::counter!("shortlink_collisions_total").increment(1);
                    debug!(attempt, code = %candidate, "Short code collision, retrying");
                }
                Err(e) => {
                    if matches!(e, AppError::Unavailable { .. }) {
                        warn!(attempt, error = %e, "Link store unavailable while shortening");
                    }
                    return Err(e);
                }
            }
        }

        metrics::counter!("shortlink_generation_exhausted_total").increment(1);
        warn!(
            strategy = %strategy,
            attempts = max_attempts,
            collisions,
            "Short code space saturated: no free candidate found"
        );

        Err(AppError::generation_exhausted(
            "Failed to allocate a unique short code",
            json!({ "attempts": max_attempts }),
        ))
    }

    /// Shortens `original_url` under a caller-chosen code.
    ///
    /// Only one insert is attempted; a taken code is reported as
    /// [`AppError::CodeConflict`] since retrying cannot help.
    pub async fn shorten_with_code(
        &self,
        original_url: &str,
        custom_code: &str,
        owner_id: Option<String>,
    ) -> Result<ShortLink, AppError> {
        let original_url = validated_url(original_url)?;
        let owner_id = normalize_owner_id(owner_id)?;
        validate_custom_code(custom_code)?;

        let new_link = NewShortLink {
            short_code: custom_code.to_string(),
            original_url,
            owner_id,
        };

        match self.repository.insert(new_link).await {
            Ok(link) => {
                metrics::counter!("shortlinks_created_total").increment(1);
                info!(
                    code = %link.short_code,
                    owned = link.owner_id.is_some(),
                    "Custom short link created"
                );
                Ok(link)
            }
            Err(AppError::CodeConflict { .. }) => Err(AppError::code_conflict(
                "Custom code already exists",
                json!({ "code": custom_code }),
            )),
            Err(e) => Err(e),
        }
    }

    /// Retrieves a link by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the code.
    pub async fn get_link(&self, code: &str) -> Result<ShortLink, AppError> {
        if !is_well_formed_code(code) {
            return Err(link_not_found(code));
        }

        self.repository
            .get_by_code(code)
            .await?
            .ok_or_else(|| link_not_found(code))
    }

    /// Lists an owner's links, most recent first.
    pub async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError> {
        let owner_id = normalize_owner_id(Some(owner_id.to_string()))?.ok_or_else(|| {
            AppError::bad_request("Owner id must not be empty", json!({}))
        })?;

        self.repository.list_by_owner(&owner_id).await
    }

    /// Deletes a link on behalf of `requester`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown code and
    /// [`AppError::Forbidden`] if `requester` does not own the link.
    pub async fn delete_link(&self, code: &str, requester: Option<String>) -> Result<(), AppError> {
        let requester = normalize_owner_id(requester)?;

        if !is_well_formed_code(code) {
            return Err(link_not_found(code));
        }

        self.repository.delete(code, requester).await?;
        info!(code, "Short link deleted");
        Ok(())
    }

    async fn next_seed(&self) -> Result<u64, AppError> {
        if self.settings.strategy.uses_store_sequence() {
            self.repository.next_sequence().await
        } else {
            Ok(rand::random())
        }
    }
}

/// Normalizes an owner identifier: blank means anonymous.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the id is too long or contains control
/// characters.
pub fn normalize_owner_id(owner_id: Option<String>) -> Result<Option<String>, AppError> {
    let Some(raw) = owner_id else {
        return Ok(None);
    };

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if trimmed.chars().count() > MAX_OWNER_ID_LENGTH {
        return Err(AppError::bad_request(
            format!("Owner id must be at most {MAX_OWNER_ID_LENGTH} characters"),
            json!({ "provided_length": trimmed.chars().count() }),
        ));
    }

    if trimmed.chars().any(char::is_control) {
        return Err(AppError::bad_request(
            "Owner id must not contain control characters",
            json!({}),
        ));
    }

    Ok(Some(trimmed.to_string()))
}

fn validated_url(input: &str) -> Result<String, AppError> {
    validate_url(input).map_err(|e| {
        AppError::invalid_url("Invalid URL", json!({ "reason": e.to_string() }))
    })
}

fn link_not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::utils::code_generator::{decode, encode};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn stored(new_link: NewShortLink) -> ShortLink {
        ShortLink::new(
            1,
            new_link.short_code,
            new_link.original_url,
            new_link.owner_id,
            Utc::now(),
        )
    }

    fn conflict() -> AppError {
        AppError::code_conflict("Short code already exists", json!({}))
    }

    fn service(repo: MockLinkRepository, settings: ShortenSettings) -> LinkService<MockLinkRepository> {
        LinkService::new(Arc::new(repo), settings)
    }

    #[tokio::test]
    async fn test_shorten_success_keeps_url_verbatim() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert()
            .withf(|new_link| {
                new_link.original_url == "https://Example.com/a/very/long/path?x=1#top"
                    && new_link.short_code.len() == 7
                    && new_link.owner_id.is_none()
            })
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let link = service(repo, ShortenSettings::default())
            .shorten("https://Example.com/a/very/long/path?x=1#top", None)
            .await
            .unwrap();

        assert_eq!(link.original_url, "https://Example.com/a/very/long/path?x=1#top");
    }

    #[tokio::test]
    async fn test_shorten_records_owner() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert()
            .withf(|new_link| new_link.owner_id.as_deref() == Some("user-42"))
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let link = service(repo, ShortenSettings::default())
            .shorten("https://example.com", Some("  user-42 ".to_string()))
            .await
            .unwrap();

        assert_eq!(link.owner_id.as_deref(), Some("user-42"));
    }

    #[tokio::test]
    async fn test_shorten_blank_owner_is_anonymous() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert()
            .withf(|new_link| new_link.owner_id.is_none())
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let link = service(repo, ShortenSettings::default())
            .shorten("https://example.com", Some("   ".to_string()))
            .await
            .unwrap();

        assert!(link.owner_id.is_none());
    }

    #[tokio::test]
    async fn test_shorten_invalid_url_never_reaches_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert().times(0);
        repo.expect_next_sequence().times(0);

        let svc = service(repo, ShortenSettings::default());

        for input in ["not a url", "not-a-url", "ftp://example.com", ""] {
            let err = svc.shorten(input, None).await.unwrap_err();
            assert!(
                matches!(err, AppError::InvalidUrl { .. }),
                "{input:?} gave {err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_shorten_retries_on_conflict() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut repo = MockLinkRepository::new();
        repo.expect_insert().times(3).returning(move |new_link| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(conflict())
            } else {
                Ok(stored(new_link))
            }
        });

        let link = service(repo, ShortenSettings::default())
            .shorten("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(link.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn test_shorten_exhausted_after_max_attempts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert().times(5).returning(|_| Err(conflict()));

        let err = service(repo, ShortenSettings::default())
            .shorten("https://example.com", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::GenerationExhausted { .. }));
        assert_eq!(err.code(), "generation_exhausted");
    }

    #[tokio::test]
    async fn test_shorten_respects_configured_attempts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert().times(2).returning(|_| Err(conflict()));

        let settings = ShortenSettings {
            max_attempts: 2,
            ..ShortenSettings::default()
        };
        let err = service(repo, settings)
            .shorten("https://example.com", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::GenerationExhausted { .. }));
    }

    #[tokio::test]
    async fn test_shorten_store_error_is_not_retried() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert()
            .times(1)
            .returning(|_| Err(AppError::unavailable("Link store unavailable", json!({}))));

        let err = service(repo, ShortenSettings::default())
            .shorten("https://example.com", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_shorten_sequential_uses_store_sequence() {
        let mut repo = MockLinkRepository::new();
        repo.expect_next_sequence().times(1).returning(|| Ok(62));
        repo.expect_insert()
            .withf(|new_link| new_link.short_code == "BA")
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let settings = ShortenSettings {
            strategy: CodeStrategy::Sequential,
            max_attempts: 5,
        };
        let link = service(repo, settings)
            .shorten("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(link.short_code, "BA");
    }

    #[tokio::test]
    async fn test_shorten_sequential_advances_past_conflicts() {
        let seq = Arc::new(AtomicUsize::new(0));
        let seq_clone = seq.clone();

        let mut repo = MockLinkRepository::new();
        repo.expect_next_sequence()
            .times(2)
            .returning(move || Ok(seq_clone.fetch_add(1, Ordering::SeqCst) as u64 + 1));
        repo.expect_insert().times(2).returning(|new_link| {
            if new_link.short_code == "B" {
                Err(conflict())
            } else {
                Ok(stored(new_link))
            }
        });

        let settings = ShortenSettings {
            strategy: CodeStrategy::Sequential,
            max_attempts: 5,
        };
        let link = service(repo, settings)
            .shorten("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(link.short_code, "C");
    }

    #[tokio::test]
    async fn test_shorten_skips_reserved_generated_codes() {
        let reserved = [decode("user").unwrap(), decode("links").unwrap()];
        let seq = Arc::new(AtomicUsize::new(0));
        let seq_clone = seq.clone();

        let mut repo = MockLinkRepository::new();
        repo.expect_next_sequence().times(3).returning(move || {
            let i = seq_clone.fetch_add(1, Ordering::SeqCst);
            Ok(reserved.get(i).copied().unwrap_or(1000))
        });
        repo.expect_insert()
            .withf(|new_link| !is_reserved(&new_link.short_code))
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let settings = ShortenSettings {
            strategy: CodeStrategy::Sequential,
            max_attempts: 5,
        };
        let link = service(repo, settings)
            .shorten("https://example.com", None)
            .await
            .unwrap();

        assert_eq!(link.short_code, encode(1000, 1));
        assert_eq!(seq.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_shorten_reserved_codes_count_as_attempts() {
        let mut repo = MockLinkRepository::new();
        repo.expect_next_sequence()
            .times(2)
            .returning(|| Ok(decode("health").unwrap()));
        repo.expect_insert().times(0);

        let settings = ShortenSettings {
            strategy: CodeStrategy::Sequential,
            max_attempts: 2,
        };
        let err = service(repo, settings)
            .shorten("https://example.com", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::GenerationExhausted { .. }));
    }

    #[tokio::test]
    async fn test_shorten_with_code_success() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert()
            .withf(|new_link| new_link.short_code == "b7F3x2")
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let link = service(repo, ShortenSettings::default())
            .shorten_with_code("https://example.com/a/very/long/path", "b7F3x2", None)
            .await
            .unwrap();

        assert_eq!(link.short_code, "b7F3x2");
    }

    #[tokio::test]
    async fn test_shorten_with_code_conflict_is_surfaced() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert().times(1).returning(|_| Err(conflict()));

        let err = service(repo, ShortenSettings::default())
            .shorten_with_code("https://example.com", "taken123", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::CodeConflict { .. }));
    }

    #[tokio::test]
    async fn test_shorten_with_invalid_custom_code() {
        let mut repo = MockLinkRepository::new();
        repo.expect_insert().times(0);

        let err = service(repo, ShortenSettings::default())
            .shorten_with_code("https://example.com", "health", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_get_link_not_found() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_by_code().times(1).returning(|_| Ok(None));

        let err = service(repo, ShortenSettings::default())
            .get_link("zzzzzz")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_link_malformed_code_skips_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_get_by_code().times(0);

        let err = service(repo, ShortenSettings::default())
            .get_link("bad code!")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_by_owner_rejects_blank_owner() {
        let mut repo = MockLinkRepository::new();
        repo.expect_list_by_owner().times(0);

        let err = service(repo, ShortenSettings::default())
            .list_by_owner("  ")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_delete_passes_requester_through() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete()
            .withf(|code, requester| code == "abc123" && requester.as_deref() == Some("alice"))
            .times(1)
            .returning(|_, _| Ok(()));

        service(repo, ShortenSettings::default())
            .delete_link("abc123", Some("alice".to_string()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_forbidden_propagates() {
        let mut repo = MockLinkRepository::new();
        repo.expect_delete()
            .times(1)
            .returning(|_, _| Err(AppError::forbidden("Not yours", json!({}))));

        let err = service(repo, ShortenSettings::default())
            .delete_link("abc123", Some("mallory".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden { .. }));
    }

    #[test]
    fn test_normalize_owner_id() {
        assert_eq!(normalize_owner_id(None).unwrap(), None);
        assert_eq!(normalize_owner_id(Some(String::new())).unwrap(), None);
        assert_eq!(
            normalize_owner_id(Some(" 1234 ".to_string())).unwrap(),
            Some("1234".to_string())
        );
        assert!(normalize_owner_id(Some("a".repeat(256))).is_err());
        assert!(normalize_owner_id(Some("bad\u{0}id".to_string())).is_err());
    }
}
