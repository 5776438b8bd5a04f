//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short link creation, lookup, listing and soft delete
//! - [`services::slug_allocator::SlugAllocator`] - Custom slug checks and code generation
//! - [`services::click_service::ClickService`] - Click counter and click log
//! - [`services::redirect_service::RedirectService`] - Short-code resolution
//! - [`services::session_service::SessionService`] - Login sessions with sliding expiry
//! - [`services::auth_service::AuthService`] - Registration, login and email verification

pub mod services;
