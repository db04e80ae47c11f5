//! DTOs for link shortening endpoint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};
use std::sync::LazyLock;
use validator::Validate;

use crate::application::services::link_service::MAX_OWNER_ID_LENGTH;
use crate::utils::code_generator::MAX_CODE_LENGTH;

/// Compiled regex for custom code validation.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").unwrap());

// `validator` length bounds are `u64`.
const OWNER_ID_MAX: u64 = MAX_OWNER_ID_LENGTH as u64;
const CUSTOM_CODE_MAX: u64 = MAX_CODE_LENGTH as u64;

/// Request to shorten a single URL.
///
/// The URL is checked only by the service, so every bad URL (including an
/// over-long one) is reported as `invalid_url`. This DTO bounds the owner id
/// and the custom code.
#[serde_as]
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// The destination URL (absolute http/https).
    pub url: String,

    /// Optional owner; blank means anonymous.
    #[serde(default, alias = "ownerId", alias = "discordId")]
    #[serde_as(as = "NoneAsEmptyString")]
    #[validate(length(max = OWNER_ID_MAX))]
    pub owner_id: Option<String>,

    /// Optional caller-chosen code instead of a generated one.
    #[serde(default, alias = "customCode")]
    #[serde_as(as = "NoneAsEmptyString")]
    #[validate(length(min = 4, max = CUSTOM_CODE_MAX))]
    #[validate(regex(path = "*CUSTOM_CODE_REGEX"))]
    pub custom_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub code: String,

    /// Absolute short URL, present when a public base URL is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_owner_aliases() {
        for key in ["owner_id", "ownerId", "discordId"] {
            let body = format!(r#"{{"url": "https://example.com", "{key}": "1234"}}"#);
            let req: ShortenRequest = serde_json::from_str(&body).unwrap();
            assert_eq!(req.owner_id.as_deref(), Some("1234"), "alias {key}");
        }
    }

    #[test]
    fn test_empty_strings_are_none() {
        let req: ShortenRequest = serde_json::from_str(
            r#"{"url": "https://example.com", "owner_id": "", "custom_code": ""}"#,
        )
        .unwrap();

        assert!(req.owner_id.is_none());
        assert!(req.custom_code.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_custom_code_charset() {
        let req: ShortenRequest =
            serde_json::from_str(r#"{"url": "https://example.com", "custom_code": "no spaces"}"#)
                .unwrap();
        assert!(req.validate().is_err());

        let req: ShortenRequest =
            serde_json::from_str(r#"{"url": "https://example.com", "custom_code": "my-Link9"}"#)
                .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_length_bounds() {
        let body = json!({ "url": "https://example.com", "owner_id": "a".repeat(256) });
        let req: ShortenRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_err());

        let body = json!({ "url": "https://example.com", "custom_code": "a".repeat(33) });
        let req: ShortenRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_long_url_left_to_service() {
        let url = format!("https://example.com/{}", "a".repeat(4096));
        let req: ShortenRequest = serde_json::from_value(json!({ "url": url })).unwrap();
        assert!(req.validate().is_ok());
    }
}
