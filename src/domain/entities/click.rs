//! Click entity representing a single successful resolution.

use chrono::{DateTime, Utc};

/// An append-only record of one resolved, non-expired access to a link.
#[derive(Debug, Clone)]
pub struct Click {
    pub id: i64,
    pub short_link_id: i64,
    pub created_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Input data for recording a new click event.
///
/// The timestamp is set by the store.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub short_link_id: i64,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Timestamp of a click, keyed by the link it belongs to.
#[derive(Debug, Clone)]
pub struct ClickStamp {
    pub short_link_id: i64,
    pub created_at: DateTime<Utc>,
}
