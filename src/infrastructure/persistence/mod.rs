//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` structs.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - `short_urls`: links, soft delete, click counter
//! - [`PgClickRepository`] - `clicks`: append-only click log
//! - [`PgUserRepository`] - `users`: accounts
//! - [`PgSessionRepository`] - `sessions`: login sessions

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_session_repository;
pub mod pg_user_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_user_repository::PgUserRepository;
