//! Business logic services for the application layer.
//!
//! Services receive their repositories as `Arc<dyn Trait>` at construction
//! and wrap every store call in the configured per-call timeout.

pub mod auth_service;
pub mod click_service;
pub mod link_service;
pub mod redirect_service;
pub mod session_service;
pub mod slug_allocator;
pub mod verification;

pub use auth_service::{AuthService, EmailVerification, Registration};
pub use click_service::{ClickReport, ClickService, CounterPath};
pub use link_service::{CreateLink, LinkService};
pub use redirect_service::{RedirectService, Resolution, Visitor};
pub use session_service::{Rejection, SessionCheck, SessionService};
pub use slug_allocator::{Slug, SlugAllocator};
pub use verification::{VerificationSigner, VerifiedEmail};
