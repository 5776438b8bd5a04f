//! Click accounting: aggregate counter plus per-event log.
//!
//! Two writes happen per click and neither rolls back the other:
//!
//! 1. `click_count + 1` on the link, atomically when the store supports it,
//!    otherwise through a read-modify-write that can lose updates under
//!    concurrent access (degraded mode).
//! 2. One appended [`Click`](crate::domain::entities::Click) row.
//!
//! Failures are logged and counted, never returned.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde_json::json;

use crate::domain::entities::NewClick;
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use crate::utils::store_call::bounded;

/// How the counter write went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterPath {
    Atomic,
    Fallback,
    Failed,
}

/// Outcome of one [`ClickService::record`] call, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickReport {
    pub counter: CounterPath,
    pub event_recorded: bool,
}

pub struct ClickService {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
    store_timeout: Duration,
}

impl ClickService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        clicks: Arc<dyn ClickRepository>,
        store_timeout: Duration,
    ) -> Self {
        Self {
            links,
            clicks,
            store_timeout,
        }
    }

    /// Records one access to `short_link_id`. Best effort.
    pub async fn record(
        &self,
        short_link_id: i64,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> ClickReport {
        let counter_path = self.bump_counter(short_link_id).await;

        let event = NewClick {
            short_link_id,
            ip_address,
            user_agent,
        };
        let recorded = bounded(self.store_timeout, "click.record", self.clicks.record(event)).await;
        let event_recorded = match recorded {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(
                    link_id = short_link_id,
                    error = %e,
                    "Failed to append click event"
                );
                counter!("click_accounting_failures_total", "stage" => "event").increment(1);
                false
            }
        };

        if counter_path != CounterPath::Failed && event_recorded {
            counter!("clicks_recorded_total").increment(1);
        }

        ClickReport {
            counter: counter_path,
            event_recorded,
        }
    }

    async fn bump_counter(&self, short_link_id: i64) -> CounterPath {
        if self.links.supports_atomic_increment() {
            match bounded(
                self.store_timeout,
                "link.increment_click_count",
                self.links.increment_click_count(short_link_id),
            )
            .await
            {
                Ok(()) => return CounterPath::Atomic,
                Err(e) => {
                    tracing::warn!(
                        link_id = short_link_id,
                        error = %e,
                        "Atomic click increment failed, falling back to read-modify-write"
                    );
                }
            }
        }

        counter!("click_counter_fallback_total").increment(1);

        match self.read_modify_write(short_link_id).await {
            Ok(()) => CounterPath::Fallback,
            Err(e) => {
                tracing::error!(
                    link_id = short_link_id,
                    error = %e,
                    "Failed to update click counter"
                );
                counter!("click_accounting_failures_total", "stage" => "counter").increment(1);
                CounterPath::Failed
            }
        }
    }

    /// Degraded path. Concurrent callers may overwrite each other's increment.
    async fn read_modify_write(&self, short_link_id: i64) -> Result<(), AppError> {
        let current = bounded(
            self.store_timeout,
            "link.click_count",
            self.links.click_count(short_link_id),
        )
        .await?
        .ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "id": short_link_id }))
        })?;

        bounded(
            self.store_timeout,
            "link.set_click_count",
            self.links.set_click_count(short_link_id, current + 1),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Click;
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use chrono::Utc;

    fn service(links: MockLinkRepository, clicks: MockClickRepository) -> ClickService {
        ClickService::new(Arc::new(links), Arc::new(clicks), Duration::from_secs(2))
    }

    fn recording_clicks() -> MockClickRepository {
        let mut clicks = MockClickRepository::new();
        clicks.expect_record().times(1).returning(|new_click| {
            Ok(Click {
                id: 1,
                short_link_id: new_click.short_link_id,
                created_at: Utc::now(),
                ip_address: new_click.ip_address,
                user_agent: new_click.user_agent,
            })
        });
        clicks
    }

    #[tokio::test]
    async fn test_atomic_path() {
        let mut links = MockLinkRepository::new();
        links.expect_supports_atomic_increment().return_const(true);
        links
            .expect_increment_click_count()
            .withf(|id| *id == 7)
            .times(1)
            .returning(|_| Ok(()));
        links.expect_click_count().times(0);
        links.expect_set_click_count().times(0);

        let report = service(links, recording_clicks())
            .record(7, Some("203.0.113.9".to_string()), Some("curl/8".to_string()))
            .await;

        assert_eq!(report.counter, CounterPath::Atomic);
        assert!(report.event_recorded);
    }

    #[tokio::test]
    async fn test_falls_back_when_atomic_increment_fails() {
        let mut links = MockLinkRepository::new();
        links.expect_supports_atomic_increment().return_const(true);
        links
            .expect_increment_click_count()
            .returning(|_| Err(AppError::internal("unsupported", json!({}))));
        links.expect_click_count().times(1).returning(|_| Ok(Some(41)));
        links
            .expect_set_click_count()
            .withf(|id, count| *id == 7 && *count == 42)
            .times(1)
            .returning(|_, _| Ok(()));

        let report = service(links, recording_clicks()).record(7, None, None).await;

        assert_eq!(report.counter, CounterPath::Fallback);
        assert!(report.event_recorded);
    }

    #[tokio::test]
    async fn test_store_without_atomic_increment_uses_fallback() {
        let mut links = MockLinkRepository::new();
        links.expect_supports_atomic_increment().return_const(false);
        links.expect_increment_click_count().times(0);
        links.expect_click_count().returning(|_| Ok(Some(0)));
        links.expect_set_click_count().times(1).returning(|_, _| Ok(()));

        let report = service(links, recording_clicks()).record(1, None, None).await;

        assert_eq!(report.counter, CounterPath::Fallback);
    }

    #[tokio::test]
    async fn test_counter_failure_does_not_block_event() {
        let mut links = MockLinkRepository::new();
        links.expect_supports_atomic_increment().return_const(true);
        links
            .expect_increment_click_count()
            .returning(|_| Err(AppError::internal("down", json!({}))));
        links
            .expect_click_count()
            .returning(|_| Err(AppError::internal("down", json!({}))));

        let report = service(links, recording_clicks()).record(1, None, None).await;

        assert_eq!(report.counter, CounterPath::Failed);
        assert!(report.event_recorded);
    }

    #[tokio::test]
    async fn test_event_failure_keeps_counter_update() {
        let mut links = MockLinkRepository::new();
        links.expect_supports_atomic_increment().return_const(true);
        links
            .expect_increment_click_count()
            .times(1)
            .returning(|_| Ok(()));

        let mut clicks = MockClickRepository::new();
        clicks
            .expect_record()
            .returning(|_| Err(AppError::internal("fk violation", json!({}))));

        let report = service(links, clicks).record(1, None, None).await;

        assert_eq!(report.counter, CounterPath::Atomic);
        assert!(!report.event_recorded);
    }
}
