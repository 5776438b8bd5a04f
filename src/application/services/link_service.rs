//! Link creation, lookup, listing and soft delete.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::json;

use crate::application::services::slug_allocator::{
    MAX_GENERATION_ATTEMPTS, Slug, SlugAllocator, slug_taken,
};
use crate::domain::entities::{Expiry, LinkWithHistory, NewShortLink, ShortLink};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;
use crate::utils::store_call::bounded;
use crate::utils::url_normalizer::normalize_destination;

/// Input for [`LinkService::create`].
#[derive(Debug, Clone, Default)]
pub struct CreateLink {
    pub original_url: String,
    pub custom_slug: Option<String>,
    pub expiry: Option<Expiry>,
    pub owner_user_id: Option<i64>,
}

/// Service for creating and retrieving shortened links.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
    allocator: SlugAllocator,
    base_url: String,
    store_timeout: Duration,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` is the public prefix of every `shortened_url`, without a
    /// trailing slash.
    pub fn new(
        links: Arc<dyn LinkRepository>,
        clicks: Arc<dyn ClickRepository>,
        base_url: String,
        store_timeout: Duration,
    ) -> Self {
        Self {
            allocator: SlugAllocator::new(links.clone(), store_timeout),
            links,
            clicks,
            base_url: base_url.trim_end_matches('/').to_string(),
            store_timeout,
        }
    }

    /// Builds the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    /// Creates a short link.
    ///
    /// The destination gets an `https://` prefix when it has no scheme and must
    /// then pass absolute-URL validation. The new link starts with
    /// `click_count = 0`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed URL or custom slug
    /// - [`AppError::Conflict`] if the custom slug is taken by an active link
    /// - [`AppError::Internal`] if generated codes keep colliding or the store fails
    pub async fn create(&self, input: CreateLink) -> Result<ShortLink, AppError> {
        let original_url = normalize_destination(&input.original_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let custom_slug = input
            .custom_slug
            .as_deref()
            .map(str::trim)
            .filter(|slug| !slug.is_empty());

        let expired_at = input
            .expiry
            .and_then(|expiry| expiry.deadline_from(Utc::now()));

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let slug = self.allocator.allocate(custom_slug).await?;

            let new_link = NewShortLink {
                original_url: original_url.clone(),
                code: slug.code().to_string(),
                shortened_url: self.short_url(slug.code()),
                expired_at,
                owner_user_id: input.owner_user_id,
            };

            match bounded(self.store_timeout, "link.create", self.links.create(new_link)).await {
                Ok(link) => {
                    tracing::info!(link_id = link.id, code = %link.code, "Short link created");
                    return Ok(link);
                }
                Err(AppError::Conflict { .. }) => match slug {
                    Slug::Custom(code) => return Err(slug_taken(&code)),
                    Slug::Generated(code) => {
                        tracing::warn!(%code, attempt, "Generated code collided, retrying");
                    }
                },
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "attempts": MAX_GENERATION_ATTEMPTS }),
        ))
    }

    /// Returns the active link whose `shortened_url` ends in `/` + `code`.
    ///
    /// A stored record whose trailing segment is not exactly `code` is treated
    /// as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no such active link exists.
    pub async fn get_by_code(&self, code: &str) -> Result<ShortLink, AppError> {
        let not_found = || AppError::not_found("Short link not found", json!({ "code": code }));

        let link = bounded(
            self.store_timeout,
            "link.find_active_by_code",
            self.links.find_active_by_code(code),
        )
        .await?
        .ok_or_else(not_found)?;

        if link.trailing_segment() != code {
            tracing::warn!(
                link_id = link.id,
                %code,
                shortened_url = %link.shortened_url,
                "Stored short URL does not end with the requested code"
            );
            return Err(not_found());
        }

        Ok(link)
    }

    /// Soft-deletes a link.
    ///
    /// When `owner_user_id` is given, links owned by anyone else are reported
    /// as not found.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no matching active link exists.
    pub async fn soft_delete(&self, id: i64, owner_user_id: Option<i64>) -> Result<(), AppError> {
        let not_found = || AppError::not_found("Short link not found", json!({ "id": id }));

        if let Some(owner) = owner_user_id {
            let link = bounded(
                self.store_timeout,
                "link.find_active_by_id",
                self.links.find_active_by_id(id),
            )
            .await?
            .ok_or_else(not_found)?;

            if !link.is_owned_by(owner) {
                return Err(not_found());
            }
        }

        let deleted = bounded(
            self.store_timeout,
            "link.soft_delete",
            self.links.soft_delete(id),
        )
        .await?;
        if !deleted {
            return Err(not_found());
        }

        tracing::info!(link_id = id, "Short link deleted");
        Ok(())
    }

    /// Lists an owner's active links, newest first, each with its click
    /// timestamps. A failed history read yields empty histories.
    pub async fn list_by_owner(
        &self,
        owner_user_id: i64,
    ) -> Result<Vec<LinkWithHistory>, AppError> {
        let links = bounded(
            self.store_timeout,
            "link.list_active_by_owner",
            self.links.list_active_by_owner(owner_user_id),
        )
        .await?;

        if links.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = links.iter().map(|link| link.id).collect();
        let stamps = bounded(
            self.store_timeout,
            "click.stamps_for_links",
            self.clicks.stamps_for_links(&ids),
        )
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(
                owner_user_id,
                error = %e,
                "Click history unavailable, listing without it"
            );
            Vec::new()
        });

        let mut history: HashMap<i64, Vec<_>> = HashMap::new();
        for stamp in stamps {
            history
                .entry(stamp.short_link_id)
                .or_default()
                .push(stamp.created_at);
        }

        Ok(links
            .into_iter()
            .map(|link| LinkWithHistory {
                click_history: history.remove(&link.id).unwrap_or_default(),
                link,
            })
            .collect())
    }

    /// Counts active links.
    pub async fn count_active(&self) -> Result<i64, AppError> {
        bounded(self.store_timeout, "link.count_active", self.links.count_active()).await
    }
}
