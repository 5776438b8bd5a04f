//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Durable storage for short links.
///
/// Every read returns only links whose status is
/// [`LinkStatus::Active`](crate::domain::entities::LinkStatus::Active).
/// Soft-deleted rows stay in the store but are invisible here.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Persists a new link with `click_count = 0`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if an active link already uses the code.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds the active link with the given code.
    async fn find_active_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds the active link with the given id.
    async fn find_active_by_id(&self, id: i64) -> Result<Option<ShortLink>, AppError>;

    /// Lists active links owned by `owner_user_id`, newest first.
    async fn list_active_by_owner(&self, owner_user_id: i64) -> Result<Vec<ShortLink>, AppError>;

    /// Soft-deletes a link by stamping `deleted_at` and `updated_at`.
    ///
    /// Returns `Ok(false)` if no active link has this id.
    async fn soft_delete(&self, id: i64) -> Result<bool, AppError>;

    /// Whether [`Self::increment_click_count`] is an indivisible store operation.
    fn supports_atomic_increment(&self) -> bool {
        true
    }

    /// Adds one to `click_count` as a single indivisible operation.
    async fn increment_click_count(&self, id: i64) -> Result<(), AppError>;

    /// Reads the current `click_count` (degraded read-modify-write path).
    async fn click_count(&self, id: i64) -> Result<Option<i64>, AppError>;

    /// Overwrites `click_count` (degraded read-modify-write path).
    async fn set_click_count(&self, id: i64, click_count: i64) -> Result<(), AppError>;

    /// Counts active links.
    async fn count_active(&self) -> Result<i64, AppError>;
}
