//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer, providing
//! concrete implementations for data persistence and mail delivery.
//!
//! # Modules
//!
//! - [`mailer`] - Verification mail delivery
//! - [`persistence`] - PostgreSQL repository implementations

pub mod mailer;
pub mod persistence;
