//! Outbound email collaborator.

use crate::error::AppError;
use async_trait::async_trait;

/// Delivers verification messages.
///
/// The core only hands over the recipient and a signed token and consumes the
/// success/failure signal; transport mechanics live behind this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification(&self, to: &str, name: &str, token: &str) -> Result<(), AppError>;
}
