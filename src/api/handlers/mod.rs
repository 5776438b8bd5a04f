//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod health;
pub mod redirect;
pub mod shorturl;

pub use auth::{
    current_user_handler, login_handler, logout_handler, register_handler,
    resend_verification_handler, verify_email_handler,
};
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shorturl::{create_handler, delete_handler, list_handler};
