//! DTOs for link lookup, listing and deletion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{NoneAsEmptyString, serde_as};

use crate::domain::entities::ShortLink;

/// One entry of `GET /user/{owner_id}`.
#[derive(Debug, Serialize)]
pub struct OwnerLinkItem {
    pub code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<ShortLink> for OwnerLinkItem {
    fn from(link: ShortLink) -> Self {
        Self {
            code: link.short_code,
            original_url: link.original_url,
            created_at: link.created_at,
        }
    }
}

/// Full record returned by `GET /links/{code}`.
#[derive(Debug, Serialize)]
pub struct LinkDetails {
    pub code: String,
    pub original_url: String,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
}

impl LinkDetails {
    pub fn new(link: ShortLink, short_url: Option<String>) -> Self {
        Self {
            code: link.short_code,
            original_url: link.original_url,
            owner_id: link.owner_id,
            created_at: link.created_at,
            short_url,
        }
    }
}

/// Query string of `DELETE /{code}`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default, alias = "ownerId", alias = "discordId")]
    #[serde_as(as = "NoneAsEmptyString")]
    pub owner_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}
