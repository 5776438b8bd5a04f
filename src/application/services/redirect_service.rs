//! Short-code resolution pipeline.
//!
//! ```text
//! code -> lookup -> NotFound
//!               \-> expiry check -> Expired
//!                               \-> normalize -> validate -> Invalid (500)
//!                                                        \-> record click -> Redirect
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::counter;
use serde_json::json;
use tokio::task::JoinHandle;

use crate::application::services::{ClickReport, ClickService, LinkService};
use crate::error::AppError;
use crate::utils::url_normalizer::{ensure_scheme, parse_absolute};

/// Request metadata stored with a click.
#[derive(Debug, Clone, Default)]
pub struct Visitor {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Terminal state of one resolution.
///
/// `destination` is the ASCII serialization of the parsed URL, so it is
/// always safe to send as a `Location` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Redirect { link_id: i64, destination: String },
    NotFound,
    Expired { expired_at: DateTime<Utc> },
}

pub struct RedirectService {
    links: Arc<LinkService>,
    clicks: Arc<ClickService>,
}

impl RedirectService {
    pub fn new(links: Arc<LinkService>, clicks: Arc<ClickService>) -> Self {
        Self { links, clicks }
    }

    pub async fn resolve(&self, code: &str, visitor: Visitor) -> Result<Resolution, AppError> {
        self.resolve_at(code, visitor, Utc::now()).await
    }

    /// Resolves `code` as of `now`.
    ///
    /// Lookup failures of any kind resolve to [`Resolution::NotFound`]. Click
    /// accounting runs in a detached task and never changes the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] only when the stored destination is not
    /// a well-formed absolute URL.
    pub async fn resolve_at(
        &self,
        code: &str,
        visitor: Visitor,
        now: DateTime<Utc>,
    ) -> Result<Resolution, AppError> {
        let (resolution, _accounting) = self.resolve_and_account(code, visitor, now).await?;
        Ok(resolution)
    }

    /// Same as [`resolve_at`](Self::resolve_at), also handing back the click
    /// accounting task of a successful redirect.
    pub async fn resolve_and_account(
        &self,
        code: &str,
        visitor: Visitor,
        now: DateTime<Utc>,
    ) -> Result<(Resolution, Option<JoinHandle<ClickReport>>), AppError> {
        let link = match self.links.get_by_code(code).await {
            Ok(link) => link,
            Err(AppError::NotFound { .. }) => {
                counter!("redirects_total", "outcome" => "not_found").increment(1);
                return Ok((Resolution::NotFound, None));
            }
            Err(e) => {
                tracing::warn!(%code, error = %e, "Lookup failed, resolving as not found");
                counter!("redirects_total", "outcome" => "not_found").increment(1);
                return Ok((Resolution::NotFound, None));
            }
        };

        if let Some(expired_at) = link.expired_at.filter(|_| link.is_expired_at(now)) {
            counter!("redirects_total", "outcome" => "expired").increment(1);
            return Ok((Resolution::Expired { expired_at }, None));
        }

        let destination = match parse_absolute(&ensure_scheme(&link.original_url)) {
            Ok(url) => String::from(url),
            Err(e) => {
                counter!("redirects_total", "outcome" => "invalid").increment(1);
                return Err(AppError::internal(
                    "Stored destination is not a valid URL",
                    json!({ "link_id": link.id, "reason": e.to_string() }),
                ));
            }
        };

        let clicks = Arc::clone(&self.clicks);
        let link_id = link.id;
        let accounting = tokio::spawn(async move {
            let report = clicks
                .record(link_id, visitor.ip_address, visitor.user_agent)
                .await;
            tracing::debug!(link_id, ?report, "Click accounted");
            report
        });

        counter!("redirects_total", "outcome" => "redirect").increment(1);
        Ok((
            Resolution::Redirect {
                link_id,
                destination,
            },
            Some(accounting),
        ))
    }
}
