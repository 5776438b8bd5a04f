//! Request extractors shared by API and page handlers.

pub mod client_meta;
pub mod current_user;

pub use client_meta::ClientMeta;
pub use current_user::{CurrentUser, MaybeUser};
