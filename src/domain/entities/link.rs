//! Short link entity and its soft-delete status.

use chrono::{DateTime, Utc};

/// Lifecycle state of a short link at the repository boundary.
///
/// Soft deletion is stored as a nullable timestamp, but callers only ever see
/// this tag. Read paths return [`LinkStatus::Active`] records exclusively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Active,
    Deleted { at: DateTime<Utc> },
}

impl LinkStatus {
    pub fn from_deleted_at(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            Some(at) => Self::Deleted { at },
            None => Self::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// A shortened URL record.
#[derive(Debug, Clone)]
pub struct ShortLink {
    pub id: i64,
    pub original_url: String,
    pub code: String,
    pub shortened_url: String,
    pub click_count: i64,
    pub expired_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: LinkStatus,
    pub owner_user_id: Option<i64>,
}

impl ShortLink {
    /// Returns true if the link has passed its expiry time at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expired_at.is_some_and(|expiry| now > expiry)
    }

    /// Returns the final path segment of `shortened_url`.
    pub fn trailing_segment(&self) -> &str {
        self.shortened_url
            .rsplit('/')
            .next()
            .unwrap_or(self.shortened_url.as_str())
    }

    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_user_id == Some(user_id)
    }
}

/// Input data for persisting a new short link.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub original_url: String,
    pub code: String,
    pub shortened_url: String,
    pub expired_at: Option<DateTime<Utc>>,
    pub owner_user_id: Option<i64>,
}

/// An active link joined with the timestamps of its recorded clicks.
#[derive(Debug, Clone)]
pub struct LinkWithHistory {
    pub link: ShortLink,
    pub click_history: Vec<DateTime<Utc>>,
}
