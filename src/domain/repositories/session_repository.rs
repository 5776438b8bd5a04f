//! Repository trait for login sessions.

use crate::domain::entities::Session;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Storage for sessions keyed by their token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: Session) -> Result<(), AppError>;

    async fn find(&self, id: &str) -> Result<Option<Session>, AppError>;

    /// Moves `last_activity` forward to `at`. Never moves it backwards.
    async fn touch(&self, id: &str, at: DateTime<Utc>) -> Result<(), AppError>;

    /// Deletes the session. Deleting an absent session is not an error.
    async fn delete(&self, id: &str) -> Result<(), AppError>;

    /// Deletes sessions whose last activity is older than `cutoff`.
    /// Returns the number of removed rows.
    async fn delete_idle_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;
}
