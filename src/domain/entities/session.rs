//! Authenticated session entity.

use chrono::{DateTime, Duration, Utc};

/// Idle lifetime of a session in seconds (7 days). Every authenticated
/// request slides the window.
pub const SESSION_IDLE_TIMEOUT_SECS: i64 = 7 * 24 * 60 * 60;

pub fn session_idle_timeout() -> Duration {
    Duration::seconds(SESSION_IDLE_TIMEOUT_SECS)
}

/// A login session identified by a high-entropy token.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl Session {
    /// A session is idle-expired once more than [`session_idle_timeout`] has
    /// elapsed since its last activity.
    pub fn is_idle_expired_at(&self, now: DateTime<Utc>) -> bool {
        now - self.last_activity > session_idle_timeout()
    }
}
