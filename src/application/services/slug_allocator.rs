//! Short code allocation and collision policy.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_slug};
use crate::utils::store_call::bounded;

/// Upper bound on insert attempts for generated codes.
pub const MAX_GENERATION_ATTEMPTS: usize = 5;

/// A code chosen for a new link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slug {
    /// Supplied by the caller; a collision is the caller's conflict.
    Custom(String),
    /// Randomly generated; a collision is retried.
    Generated(String),
}

impl Slug {
    pub fn code(&self) -> &str {
        match self {
            Slug::Custom(code) | Slug::Generated(code) => code,
        }
    }
}

/// Produces codes for new links.
///
/// Custom slugs are validated and checked against active links up front.
/// Generated codes are not pre-checked; the store's unique index decides and
/// [`crate::application::services::LinkService`] retries up to
/// [`MAX_GENERATION_ATTEMPTS`] times.
pub struct SlugAllocator {
    links: Arc<dyn LinkRepository>,
    store_timeout: Duration,
}

impl SlugAllocator {
    pub fn new(links: Arc<dyn LinkRepository>, store_timeout: Duration) -> Self {
        Self {
            links,
            store_timeout,
        }
    }

    /// Chooses a code for a new link.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the custom slug has the wrong shape or is reserved
    /// - [`AppError::Conflict`] if an active link already uses the custom slug
    pub async fn allocate(&self, custom_slug: Option<&str>) -> Result<Slug, AppError> {
        match custom_slug {
            Some(slug) => self.claim_custom(slug).await.map(Slug::Custom),
            None => Ok(Slug::Generated(generate_code())),
        }
    }

    async fn claim_custom(&self, slug: &str) -> Result<String, AppError> {
        validate_custom_slug(slug)?;

        let existing = bounded(
            self.store_timeout,
            "link.find_active_by_code",
            self.links.find_active_by_code(slug),
        )
        .await?;

        if existing.is_some() {
            return Err(slug_taken(slug));
        }

        Ok(slug.to_string())
    }
}

pub(crate) fn slug_taken(slug: &str) -> AppError {
    AppError::conflict("Custom slug already in use", json!({ "slug": slug }))
}
