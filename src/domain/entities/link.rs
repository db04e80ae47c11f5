//! ShortLink entity representing a short code to destination mapping.

use chrono::{DateTime, Utc};

/// A persisted short link.
///
/// Every field is immutable once the store has assigned it. `owner_id` is `None`
/// for links created anonymously.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(
        id: i64,
        short_code: String,
        original_url: String,
        owner_id: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            short_code,
            original_url,
            owner_id,
            created_at,
        }
    }

    /// Returns true if `requester` may delete this link.
    ///
    /// Ownership is exact: an owned link requires the same owner id, an anonymous
    /// link can only be removed by an anonymous request.
    pub fn is_owned_by(&self, requester: Option<&str>) -> bool {
        self.owner_id.as_deref() == requester
    }
}

/// Input data for inserting a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortLink {
    pub short_code: String,
    pub original_url: String,
    pub owner_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(owner: Option<&str>) -> ShortLink {
        ShortLink::new(
            1,
            "b7F3x2".to_string(),
            "https://example.com".to_string(),
            owner.map(str::to_string),
            Utc::now(),
        )
    }

    #[test]
    fn test_link_creation() {
        let now = Utc::now();
        let link = ShortLink::new(
            7,
            "abc123".to_string(),
            "https://example.com".to_string(),
            Some("user-1".to_string()),
            now,
        );

        assert_eq!(link.id, 7);
        assert_eq!(link.short_code, "abc123");
        assert_eq!(link.original_url, "https://example.com");
        assert_eq!(link.owner_id.as_deref(), Some("user-1"));
        assert_eq!(link.created_at, now);
    }

    #[test]
    fn test_owner_can_delete() {
        assert!(link(Some("alice")).is_owned_by(Some("alice")));
    }

    #[test]
    fn test_other_user_cannot_delete() {
        assert!(!link(Some("alice")).is_owned_by(Some("bob")));
        assert!(!link(Some("alice")).is_owned_by(None));
    }

    #[test]
    fn test_anonymous_link_ownership() {
        assert!(link(None).is_owned_by(None));
        assert!(!link(None).is_owned_by(Some("alice")));
    }
}
