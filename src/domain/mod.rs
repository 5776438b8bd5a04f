//! Domain layer containing business entities and repository contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`mailer`] - Outbound email collaborator
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Services in [`crate::application::services`] receive repository
//! trait objects constructed once at process start.

pub mod entities;
pub mod mailer;
pub mod repositories;
