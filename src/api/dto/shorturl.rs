//! DTOs for short URL management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{DefaultOnError, DisplayFromStr, PickFirst, serde_as};

use crate::domain::entities::{Expiry, ExpiryUnit, LinkWithHistory, ShortLink};

/// `POST /api/shorturl/create`
///
/// `userId` is accepted for compatibility and ignored: the owner is always the
/// session user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortUrlRequest {
    #[serde(default)]
    pub original_url: String,
    pub custom_slug: Option<String>,
    pub expiry: Option<ExpiryRequest>,
    pub user_id: Option<Value>,
}

/// Relative expiry such as `{"value": 3, "unit": "days"}`.
///
/// `value` may be a number or a numeric string; anything unparsable means
/// no expiry.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct ExpiryRequest {
    #[serde_as(as = "DefaultOnError<Option<PickFirst<(_, DisplayFromStr)>>>")]
    #[serde(default)]
    pub value: Option<i64>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl ExpiryRequest {
    pub fn to_expiry(&self) -> Option<Expiry> {
        let value = self.value?;
        let unit = ExpiryUnit::parse(self.unit.as_deref().unwrap_or_default());
        Some(Expiry::new(value, unit))
    }
}

/// A link as returned by create.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlDto {
    pub id: i64,
    pub original_url: String,
    pub shortened_url: String,
    pub code: String,
    pub click_count: i64,
    pub expired_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Option<i64>,
}

impl From<ShortLink> for ShortUrlDto {
    fn from(link: ShortLink) -> Self {
        Self {
            id: link.id,
            original_url: link.original_url,
            shortened_url: link.shortened_url,
            code: link.code,
            click_count: link.click_count,
            expired_at: link.expired_at,
            created_at: link.created_at,
            updated_at: link.updated_at,
            user_id: link.owner_user_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShortUrlResponse {
    pub success: bool,
    pub message: String,
    pub short_url: ShortUrlDto,
}

#[derive(Debug, Serialize)]
pub struct ClickHistoryEntry {
    pub timestamp: DateTime<Utc>,
}

/// A link as listed on the dashboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortUrlListItem {
    pub id: i64,
    pub original_url: String,
    pub shortened_url: String,
    pub code: String,
    pub click_count: i64,
    pub expired_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_expired: bool,
    pub click_history: Vec<ClickHistoryEntry>,
}

impl ShortUrlListItem {
    pub fn at(entry: LinkWithHistory, now: DateTime<Utc>) -> Self {
        let LinkWithHistory {
            link,
            click_history,
        } = entry;

        Self {
            is_expired: link.is_expired_at(now),
            id: link.id,
            original_url: link.original_url,
            shortened_url: link.shortened_url,
            code: link.code,
            click_count: link.click_count,
            expired_at: link.expired_at,
            created_at: link.created_at,
            updated_at: link.updated_at,
            click_history: click_history
                .into_iter()
                .map(|timestamp| ClickHistoryEntry { timestamp })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ShortUrlListResponse {
    pub success: bool,
    pub data: Vec<ShortUrlListItem>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
