//! Repository trait definitions for the domain layer.
//!
//! These traits abstract the single shared persistent store. Implementations
//! live in `crate::infrastructure::persistence`; mock implementations are
//! generated via `mockall` for unit tests.
//!
//! - [`LinkRepository`] - short link CRUD, soft delete and click counter
//! - [`ClickRepository`] - append-only click log
//! - [`UserRepository`] - user accounts
//! - [`SessionRepository`] - login sessions

pub mod click_repository;
pub mod link_repository;
pub mod session_repository;
pub mod user_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
