//! Mailer that writes verification links to the log instead of sending mail.

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::mailer::Mailer;
use crate::error::AppError;

/// A [`Mailer`] that only logs.
///
/// Used when no mail transport is configured. The verification link is logged
/// at `INFO` so a developer can open it by hand.
pub struct LogMailer {
    base_url: String,
}

impl LogMailer {
    /// Creates a new LogMailer building links under `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        debug!("Using LogMailer (verification mail is logged, not sent)");
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn verification_link(&self, token: &str) -> String {
        format!("{}/verify-email?token={}", self.base_url, token)
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification(&self, to: &str, name: &str, token: &str) -> Result<(), AppError> {
        info!(
            %to,
            %name,
            link = %self.verification_link(token),
            "Verification email"
        );
        Ok(())
    }
}
