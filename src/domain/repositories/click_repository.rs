//! Repository trait for the append-only click log.

use crate::domain::entities::{Click, ClickStamp, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only storage for click events.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Appends one click event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors, including a missing
    /// referenced link.
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Returns the click timestamps of the given links, oldest first.
    async fn stamps_for_links(&self, link_ids: &[i64]) -> Result<Vec<ClickStamp>, AppError>;

    /// Counts clicks recorded for one link.
    async fn count_for_link(&self, link_id: i64) -> Result<i64, AppError>;

    /// Counts all recorded clicks.
    async fn count_all(&self) -> Result<i64, AppError>;
}
